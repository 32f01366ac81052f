//! The canvas service object.
//!
//! One `CanvasStore` is constructed at startup and handed to every view that
//! needs it. It owns the working graph, selection, boards, execution status
//! and asset library, and writes the persisted subset (boards, assets, active
//! category) through to storage after each action that changes it.

use crate::assets::AssetLibrary;
use crate::board::BoardRegistry;
use crate::config::StoreConfig;
use crate::error::{BoardError, GraphError, PersistenceError, StoreError};
use crate::execution::ExecutionTracker;
use crate::graph::{GraphSnapshot, GraphStore, NodeRemoval, Selection};
use crate::model::*;
use crate::persistence::{MemoryStorage, PersistedState, PersistenceGateway, StateStorage};
use tracing::{info, warn};

/// What changed in a completed state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreEvent {
    GraphChanged,
    SelectionChanged,
    BoardsChanged,
    CurrentBoardChanged,
    ExecutionChanged,
    AssetsChanged,
    CategoryChanged,
    PanelsChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent) + Send>;

/// Open/closed state of the editor's side panels. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelState {
    pub asset_library_open: bool,
    pub node_palette_open: bool,
    pub inspector_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    AssetLibrary,
    NodePalette,
    Inspector,
}

pub struct CanvasStore {
    config: StoreConfig,
    graph: GraphStore,
    boards: BoardRegistry,
    execution: ExecutionTracker,
    assets: AssetLibrary,
    active_category: Category,
    panels: PanelState,
    gateway: PersistenceGateway,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    last_persistence_error: Option<String>,
    write_through_suspended: bool,
}

impl CanvasStore {
    /// Builds a store over `storage`, rehydrating the persisted subset.
    ///
    /// An unreadable payload is ignored and the store starts empty. The
    /// payload stays in storage: write-through is suspended until an explicit
    /// [`CanvasStore::flush`] replaces it.
    pub fn open(config: StoreConfig, storage: Box<dyn StateStorage>) -> Self {
        let gateway = PersistenceGateway::new(storage, config.storage_key.clone());
        let (state, last_persistence_error) = match gateway.try_load() {
            Ok(Some(state)) => (state, None),
            Ok(None) => (
                PersistedState {
                    active_category: config.default_category,
                    ..PersistedState::default()
                },
                None,
            ),
            Err(e) => {
                warn!(error = %e, "persisted state unreadable; starting empty");
                (
                    PersistedState {
                        active_category: config.default_category,
                        ..PersistedState::default()
                    },
                    Some(e.to_string()),
                )
            }
        };
        info!(
            boards = state.boards.len(),
            assets = state.assets.len(),
            category = %state.active_category,
            "canvas store opened"
        );

        Self {
            graph: GraphStore::new(),
            boards: BoardRegistry::with_boards(state.boards, config.registry_options()),
            execution: ExecutionTracker::new(),
            assets: AssetLibrary::with_assets(state.assets),
            active_category: state.active_category,
            panels: PanelState::default(),
            gateway,
            listeners: Vec::new(),
            next_subscription: 0,
            write_through_suspended: last_persistence_error.is_some(),
            last_persistence_error,
            config,
        }
    }

    /// A store backed by process memory, for tests and previews.
    pub fn in_memory() -> Self {
        Self::open(StoreConfig::default(), Box::new(MemoryStorage::new()))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // --- Read access ---

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn nodes(&self) -> &[CanvasNode] {
        self.graph.nodes()
    }

    pub fn edges(&self) -> &[CanvasEdge] {
        self.graph.edges()
    }

    pub fn selection(&self) -> &Selection {
        self.graph.selection()
    }

    pub fn boards(&self) -> &[Board] {
        self.boards.boards()
    }

    pub fn board_registry(&self) -> &BoardRegistry {
        &self.boards
    }

    pub fn current_board(&self) -> Option<&Board> {
        self.boards.current_board()
    }

    pub fn execution(&self) -> &ExecutionTracker {
        &self.execution
    }

    pub fn current_execution(&self) -> Option<&WorkflowExecution> {
        self.execution.current_execution()
    }

    pub fn is_executing(&self) -> bool {
        self.execution.is_executing()
    }

    pub fn assets(&self) -> &AssetLibrary {
        &self.assets
    }

    pub fn active_category(&self) -> Category {
        self.active_category
    }

    pub fn panels(&self) -> PanelState {
        self.panels
    }

    /// Message of the most recent failed load or save, if any.
    pub fn last_persistence_error(&self) -> Option<&str> {
        self.last_persistence_error.as_deref()
    }

    /// True after a failed load, until the next successful `flush`.
    pub fn is_write_through_suspended(&self) -> bool {
        self.write_through_suspended
    }

    /// The subset that is written to storage.
    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            boards: self.boards.boards().to_vec(),
            assets: self.assets.assets().to_vec(),
            active_category: self.active_category,
        }
    }

    // --- Subscriptions ---

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() < before
    }

    // --- Graph ---

    pub fn set_nodes(&mut self, nodes: Vec<CanvasNode>) {
        let before = self.graph.selection().clone();
        self.graph.set_nodes(nodes);
        self.after_graph_change(&before);
    }

    pub fn set_edges(&mut self, edges: Vec<CanvasEdge>) {
        let before = self.graph.selection().clone();
        self.graph.set_edges(edges);
        self.after_graph_change(&before);
    }

    pub fn load_graph(
        &mut self,
        nodes: Vec<CanvasNode>,
        edges: Vec<CanvasEdge>,
    ) -> Result<(), GraphError> {
        let before = self.graph.selection().clone();
        self.graph.load_graph(nodes, edges)?;
        self.after_graph_change(&before);
        Ok(())
    }

    pub fn add_node(&mut self, node: CanvasNode) -> Result<(), GraphError> {
        self.graph.add_node(node)?;
        self.emit(StoreEvent::GraphChanged);
        Ok(())
    }

    pub fn update_node(&mut self, id: &str, patch: NodePatch) -> bool {
        let updated = self.graph.update_node(id, patch);
        if updated {
            self.emit(StoreEvent::GraphChanged);
        }
        updated
    }

    pub fn delete_node(&mut self, id: &str) -> Option<NodeRemoval> {
        let before = self.graph.selection().clone();
        let removal = self.graph.delete_node(id)?;
        self.after_graph_change(&before);
        Some(removal)
    }

    pub fn add_edge(&mut self, edge: CanvasEdge) -> Result<(), GraphError> {
        self.graph.add_edge(edge)?;
        self.emit(StoreEvent::GraphChanged);
        Ok(())
    }

    pub fn delete_edge(&mut self, id: &str) -> Option<CanvasEdge> {
        let before = self.graph.selection().clone();
        let edge = self.graph.delete_edge(id)?;
        self.after_graph_change(&before);
        Some(edge)
    }

    // --- Selection ---

    pub fn set_selected_nodes<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.graph.set_selected_nodes(ids);
        self.emit(StoreEvent::SelectionChanged);
    }

    pub fn set_selected_edges<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.graph.set_selected_edges(ids);
        self.emit(StoreEvent::SelectionChanged);
    }

    pub fn clear_selection(&mut self) {
        self.graph.clear_selection();
        self.emit(StoreEvent::SelectionChanged);
    }

    // --- Boards ---

    pub fn create_board(&mut self, name: &str, category: Category) -> Board {
        let board = self.boards.create_board(name, category);
        self.persist();
        self.emit(StoreEvent::BoardsChanged);
        board
    }

    pub fn duplicate_board(&mut self, id: &str, name: &str) -> Result<Board, BoardError> {
        let board = self.boards.duplicate_board(id, name)?;
        self.persist();
        self.emit(StoreEvent::BoardsChanged);
        Ok(board)
    }

    /// Makes `board` active and hydrates the live graph from it.
    pub fn set_current_board(&mut self, board: Option<Board>) {
        self.boards.set_current_board(board, &mut self.graph);
        self.emit(StoreEvent::CurrentBoardChanged);
        self.emit(StoreEvent::GraphChanged);
        self.emit(StoreEvent::SelectionChanged);
    }

    pub fn open_board(&mut self, id: &str) -> Result<(), BoardError> {
        self.boards.open_board(id, &mut self.graph)?;
        self.emit(StoreEvent::CurrentBoardChanged);
        self.emit(StoreEvent::GraphChanged);
        self.emit(StoreEvent::SelectionChanged);
        Ok(())
    }

    pub fn update_board(&mut self, id: &str, patch: BoardPatch) -> Result<Board, BoardError> {
        let board = self.boards.update_board(id, patch)?;
        self.persist();
        self.emit(StoreEvent::BoardsChanged);
        if self.boards.current_board().is_some_and(|c| c.id == id) {
            self.emit(StoreEvent::CurrentBoardChanged);
        }
        Ok(board)
    }

    /// Writes the live graph into the active board record.
    pub fn save_current_board(&mut self) -> Result<Board, BoardError> {
        let board = self.boards.save_current_board(&self.graph)?;
        self.persist();
        self.emit(StoreEvent::BoardsChanged);
        self.emit(StoreEvent::CurrentBoardChanged);
        Ok(board)
    }

    pub fn delete_board(&mut self, id: &str) -> Option<Board> {
        let was_active = self.boards.current_board().is_some_and(|c| c.id == id);
        let removed = self.boards.delete_board(id, &mut self.graph)?;
        self.persist();
        self.emit(StoreEvent::BoardsChanged);
        if was_active {
            self.emit(StoreEvent::CurrentBoardChanged);
            self.emit(StoreEvent::GraphChanged);
            self.emit(StoreEvent::SelectionChanged);
        }
        Some(removed)
    }

    // --- Execution ---

    pub fn set_current_execution(&mut self, execution: Option<WorkflowExecution>) {
        self.execution.set_current_execution(execution);
        self.emit(StoreEvent::ExecutionChanged);
    }

    pub fn set_is_executing(&mut self, executing: bool) -> Result<(), StoreError> {
        self.execution.set_is_executing(executing)?;
        self.emit(StoreEvent::ExecutionChanged);
        Ok(())
    }

    /// Validates the live graph, records the run as started and returns the
    /// snapshot the engine should run.
    pub fn start_execution(
        &mut self,
        mut execution: WorkflowExecution,
    ) -> Result<GraphSnapshot, StoreError> {
        let snapshot = self.graph.snapshot_for_execution()?;
        if execution.board_id.is_none() {
            execution.board_id = self.boards.current_board().map(|b| b.id.clone());
        }
        self.execution.begin(execution)?;
        self.emit(StoreEvent::ExecutionChanged);
        Ok(snapshot)
    }

    /// Applies an engine update. Node status updates are mirrored onto the
    /// matching live node so views can render per-node progress.
    pub fn apply_execution_update(
        &mut self,
        execution_id: &str,
        update: ExecutionUpdate,
    ) -> Result<(), StoreError> {
        let mirrored = match &update {
            ExecutionUpdate::NodeStatus { node_id, status } => Some((node_id.clone(), *status)),
            _ => None,
        };
        self.execution.apply(execution_id, update)?;
        if let Some((node_id, status)) = mirrored {
            if self
                .graph
                .update_node_data(&node_id, |data| data.status = status)
            {
                self.emit(StoreEvent::GraphChanged);
            }
        }
        self.emit(StoreEvent::ExecutionChanged);
        Ok(())
    }

    // --- Assets ---

    pub fn add_asset(&mut self, asset: Asset) {
        self.assets.add_asset(asset);
        self.persist();
        self.emit(StoreEvent::AssetsChanged);
    }

    pub fn remove_asset(&mut self, id: &str) -> Option<Asset> {
        let removed = self.assets.remove_asset(id)?;
        self.persist();
        self.emit(StoreEvent::AssetsChanged);
        Some(removed)
    }

    pub fn update_asset_tags(&mut self, id: &str, tags: Vec<String>) -> bool {
        let updated = self.assets.update_asset_tags(id, tags);
        if updated {
            self.persist();
            self.emit(StoreEvent::AssetsChanged);
        }
        updated
    }

    pub fn save_story(&mut self, story: StoryData, tags: Vec<String>) -> Asset {
        let asset = self.assets.save_story(story, tags);
        self.persist();
        self.emit(StoreEvent::AssetsChanged);
        asset
    }

    // --- Category & panels ---

    pub fn set_active_category(&mut self, category: Category) {
        if self.active_category == category {
            return;
        }
        self.active_category = category;
        self.persist();
        self.emit(StoreEvent::CategoryChanged);
    }

    pub fn set_panel_open(&mut self, panel: Panel, open: bool) {
        let slot = match panel {
            Panel::AssetLibrary => &mut self.panels.asset_library_open,
            Panel::NodePalette => &mut self.panels.node_palette_open,
            Panel::Inspector => &mut self.panels.inspector_open,
        };
        if *slot != open {
            *slot = open;
            self.emit(StoreEvent::PanelsChanged);
        }
    }

    pub fn toggle_panel(&mut self, panel: Panel) {
        let open = match panel {
            Panel::AssetLibrary => self.panels.asset_library_open,
            Panel::NodePalette => self.panels.node_palette_open,
            Panel::Inspector => self.panels.inspector_open,
        };
        self.set_panel_open(panel, !open);
    }

    // --- Persistence ---

    /// Writes the persisted subset now, regardless of `write_through`.
    /// A successful flush also resumes suspended write-through.
    pub fn flush(&mut self) -> Result<(), PersistenceError> {
        let result = self.gateway.save(&self.persisted_state());
        self.last_persistence_error = result.as_ref().err().map(ToString::to_string);
        if result.is_ok() && self.write_through_suspended {
            info!(key = %self.gateway.key(), "stored payload replaced; write-through resumed");
            self.write_through_suspended = false;
        }
        result
    }

    fn persist(&mut self) {
        if !self.config.write_through {
            return;
        }
        if self.write_through_suspended {
            warn!(
                key = %self.gateway.key(),
                "write-through suspended; stored payload was unreadable and is kept"
            );
            return;
        }
        if let Err(e) = self.flush() {
            warn!(error = %e, "write-through persistence failed; in-memory state kept");
        }
    }

    fn after_graph_change(&mut self, selection_before: &Selection) {
        self.emit(StoreEvent::GraphChanged);
        if self.graph.selection() != selection_before {
            self.emit(StoreEvent::SelectionChanged);
        }
    }

    fn emit(&mut self, event: StoreEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for CanvasStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasStore")
            .field("nodes", &self.graph.nodes().len())
            .field("edges", &self.graph.edges().len())
            .field("boards", &self.boards.boards().len())
            .field("assets", &self.assets.len())
            .field("active_category", &self.active_category)
            .field("is_executing", &self.execution.is_executing())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
