use crate::error::{BoardError, GraphError};
use crate::graph::GraphStore;
use crate::model::{Board, BoardPatch, Category, Viewport};
use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Behaviour switches for the registry's interaction with the live graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Clear the selection whenever a different board is hydrated.
    pub clear_selection_on_switch: bool,
    /// Empty the live graph when the active board is deleted.
    pub reset_graph_on_active_delete: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            clear_selection_on_switch: true,
            reset_graph_on_active_delete: true,
        }
    }
}

/// The collection of saved boards and the currently active one.
///
/// Loading a board copies its graph into the [`GraphStore`]; edits to the live
/// graph reach the board record only through an explicit
/// [`BoardRegistry::save_current_board`] or [`BoardRegistry::update_board`].
#[derive(Debug, Clone, Default)]
pub struct BoardRegistry {
    boards: Vec<Board>,
    current_board: Option<Board>,
    options: RegistryOptions,
}

impl BoardRegistry {
    pub fn new(options: RegistryOptions) -> Self {
        Self {
            boards: Vec::new(),
            current_board: None,
            options,
        }
    }

    pub fn with_boards(boards: Vec<Board>, options: RegistryOptions) -> Self {
        Self {
            boards,
            current_board: None,
            options,
        }
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn board(&self, id: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    pub fn current_board(&self) -> Option<&Board> {
        self.current_board.as_ref()
    }

    pub fn boards_in_category(&self, category: Category) -> impl Iterator<Item = &Board> {
        self.boards.iter().filter(move |b| b.category == category)
    }

    /// Creates an empty board and appends it. It does not become active.
    pub fn create_board(&mut self, name: &str, category: Category) -> Board {
        let now = Utc::now();
        let board = Board {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            category,
            nodes: Vec::new(),
            edges: Vec::new(),
            viewport: Viewport::default(),
            created_at: now,
            updated_at: now,
        };
        debug!(board_id = %board.id, name, %category, "create_board");
        self.boards.push(board.clone());
        board
    }

    /// Copies an existing board's graph and viewport under a new id and name.
    pub fn duplicate_board(&mut self, id: &str, name: &str) -> Result<Board, BoardError> {
        let source = self
            .board(id)
            .ok_or_else(|| BoardError::BoardNotFound(id.to_string()))?;
        let now = Utc::now();
        let copy = Board {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
            ..source.clone()
        };
        debug!(source_id = id, board_id = %copy.id, "duplicate_board");
        self.boards.push(copy.clone());
        Ok(copy)
    }

    /// Makes `board` active and replaces the live graph with its stored
    /// nodes and edges, or empties the graph for `None`.
    pub fn set_current_board(&mut self, board: Option<Board>, graph: &mut GraphStore) {
        if self.options.clear_selection_on_switch {
            graph.clear_selection();
        }
        match &board {
            Some(board) => {
                graph.set_nodes(board.nodes.clone());
                graph.set_edges(board.edges.clone());
                let dangling = graph.validate();
                if !dangling.is_empty() {
                    warn!(
                        board_id = %board.id,
                        dangling = dangling.len(),
                        "hydrated board contains dangling edges"
                    );
                }
                debug!(board_id = %board.id, "set_current_board");
            }
            None => {
                graph.set_nodes(Vec::new());
                graph.set_edges(Vec::new());
                debug!("set_current_board: none");
            }
        }
        self.current_board = board;
    }

    /// Looks up a stored board by id and makes it active.
    pub fn open_board(&mut self, id: &str, graph: &mut GraphStore) -> Result<(), BoardError> {
        let board = self
            .board(id)
            .cloned()
            .ok_or_else(|| BoardError::BoardNotFound(id.to_string()))?;
        self.set_current_board(Some(board), graph);
        Ok(())
    }

    /// Merges `patch` into the board and refreshes `updated_at`. The active
    /// board mirror is replaced with the identical record.
    pub fn update_board(&mut self, id: &str, patch: BoardPatch) -> Result<Board, BoardError> {
        let board = self
            .boards
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| BoardError::BoardNotFound(id.to_string()))?;
        patch.apply(board, Utc::now());
        let updated = board.clone();

        if self.current_board.as_ref().is_some_and(|c| c.id == id) {
            self.current_board = Some(updated.clone());
        }
        debug!(board_id = id, "update_board");
        Ok(updated)
    }

    /// Writes the live graph back into the active board record.
    pub fn save_current_board(&mut self, graph: &GraphStore) -> Result<Board, BoardError> {
        let id = self
            .current_board
            .as_ref()
            .map(|b| b.id.clone())
            .ok_or(BoardError::NoActiveBoard)?;
        let dangling = graph.validate();
        if !dangling.is_empty() {
            return Err(BoardError::Graph(GraphError::InvalidGraph(dangling)));
        }
        let snapshot = graph.snapshot();
        self.update_board(&id, BoardPatch::graph(snapshot.nodes, snapshot.edges))
    }

    /// Removes a board. Deleting the active board clears `current_board` and,
    /// unless disabled, empties the live graph and selection.
    pub fn delete_board(&mut self, id: &str, graph: &mut GraphStore) -> Option<Board> {
        let index = self.boards.iter().position(|b| b.id == id)?;
        let removed = self.boards.remove(index);

        if self.current_board.as_ref().is_some_and(|c| c.id == id) {
            self.current_board = None;
            if self.options.reset_graph_on_active_delete {
                graph.clear();
            }
        }
        debug!(board_id = id, "delete_board");
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CanvasNode;

    #[test]
    fn create_board_defaults() {
        let mut registry = BoardRegistry::default();
        let board = registry.create_board("Look A", Category::Fashion);

        assert_eq!(board.viewport, Viewport::default());
        assert_eq!(board.created_at, board.updated_at);
        assert!(board.nodes.is_empty());
        assert!(registry.current_board().is_none());
        assert_eq!(registry.boards().len(), 1);
    }

    #[test]
    fn update_keeps_mirror_identical() {
        let mut registry = BoardRegistry::default();
        let mut graph = GraphStore::new();
        let board = registry.create_board("Look A", Category::Fashion);
        registry.open_board(&board.id, &mut graph).unwrap();

        let updated = registry
            .update_board(&board.id, BoardPatch::rename("Look B"))
            .unwrap();

        assert_eq!(registry.current_board(), Some(&updated));
        assert_eq!(registry.board(&board.id), Some(&updated));
        assert!(updated.updated_at >= board.updated_at);
    }

    #[test]
    fn keeping_graph_on_active_delete() {
        let options = RegistryOptions {
            reset_graph_on_active_delete: false,
            ..RegistryOptions::default()
        };
        let mut registry = BoardRegistry::new(options);
        let mut graph = GraphStore::new();
        let board = registry.create_board("Temp", Category::Video);
        registry.open_board(&board.id, &mut graph).unwrap();
        graph.add_node(CanvasNode::new("n1", "text")).unwrap();

        registry.delete_board(&board.id, &mut graph);

        assert!(registry.current_board().is_none());
        assert_eq!(graph.nodes().len(), 1);
    }
}
