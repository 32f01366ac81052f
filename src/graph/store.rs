use super::Selection;
use crate::error::{DanglingEdge, GraphError};
use crate::model::{CanvasEdge, CanvasNode, NodeData, NodePatch};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Immutable copy of the graph handed to the execution engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<CanvasNode>,
    pub edges: Vec<CanvasEdge>,
}

/// What a node deletion took out of the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRemoval {
    pub node: CanvasNode,
    pub edges: Vec<CanvasEdge>,
}

/// Owner of the live `nodes`/`edges` lists and the selection over them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStore {
    nodes: Vec<CanvasNode>,
    edges: Vec<CanvasEdge>,
    selection: Selection,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[CanvasEdge] {
        &self.edges
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&CanvasNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&CanvasEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Every edge with `id` as source or target.
    pub fn edges_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a CanvasEdge> + 'a {
        self.edges.iter().filter(move |e| e.touches(id))
    }

    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a CanvasEdge> + 'a {
        self.edges.iter().filter(move |e| e.target == id)
    }

    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a CanvasEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == id)
    }

    pub fn selected_nodes(&self) -> impl Iterator<Item = &CanvasNode> {
        self.selection
            .selected_nodes()
            .iter()
            .filter_map(|id| self.node(id))
    }

    // --- Bulk replacement ---

    /// Replaces the node list. Edges are not checked here: a caller loading a
    /// graph in two steps may briefly hold edges whose endpoints arrive with
    /// the next call. Selection is reconciled immediately.
    pub fn set_nodes(&mut self, nodes: Vec<CanvasNode>) {
        self.nodes = nodes;
        let pruned = self.selection.reconcile(&self.nodes, &self.edges);
        debug!(nodes = self.nodes.len(), pruned, "set_nodes");
    }

    /// Replaces the edge list. See [`GraphStore::set_nodes`] for the
    /// two-phase loading window.
    pub fn set_edges(&mut self, edges: Vec<CanvasEdge>) {
        self.edges = edges;
        let pruned = self.selection.reconcile(&self.nodes, &self.edges);
        debug!(edges = self.edges.len(), pruned, "set_edges");
    }

    /// Replaces nodes and edges together after validating them. On error the
    /// graph is left untouched.
    pub fn load_graph(
        &mut self,
        nodes: Vec<CanvasNode>,
        edges: Vec<CanvasEdge>,
    ) -> Result<(), GraphError> {
        Self::check_unique_ids(&nodes, &edges)?;
        let dangling = Self::find_dangling(&nodes, &edges);
        if !dangling.is_empty() {
            return Err(GraphError::InvalidGraph(dangling));
        }
        self.nodes = nodes;
        self.edges = edges;
        let pruned = self.selection.reconcile(&self.nodes, &self.edges);
        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            pruned,
            "load_graph"
        );
        Ok(())
    }

    /// Empties the graph and the selection.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.selection.clear();
    }

    // --- Node operations ---

    /// Appends a node. Node ids must be unique within the graph.
    pub fn add_node(&mut self, node: CanvasNode) -> Result<(), GraphError> {
        if self.contains_node(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        debug!(node_id = %node.id, node_type = %node.node_type, "add_node");
        self.nodes.push(node);
        Ok(())
    }

    /// Shallow-merges `patch` into the node. Returns `false` if no such node.
    pub fn update_node(&mut self, id: &str, patch: NodePatch) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                patch.apply(node);
                debug!(node_id = id, "update_node");
                true
            }
            None => false,
        }
    }

    /// Edits a node's data in place. Returns `false` if no such node.
    pub fn update_node_data<F>(&mut self, id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut NodeData),
    {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                edit(&mut node.data);
                true
            }
            None => false,
        }
    }

    /// Removes the node, every edge touching it, and its id and those edges'
    /// ids from the selection, as one transition. Absent ids are a no-op.
    pub fn delete_node(&mut self, id: &str) -> Option<NodeRemoval> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        let node = self.nodes.remove(index);

        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.edges)
                .into_iter()
                .partition(|e| e.touches(id));
        self.edges = kept;

        self.selection.forget_node(id);
        self.selection
            .forget_edges(removed.iter().map(|e| e.id.as_str()));

        debug!(node_id = id, removed_edges = removed.len(), "delete_node");
        Some(NodeRemoval {
            node,
            edges: removed,
        })
    }

    // --- Edge operations ---

    /// Appends an edge after checking both endpoints exist.
    pub fn add_edge(&mut self, edge: CanvasEdge) -> Result<(), GraphError> {
        if self.edge(&edge.id).is_some() {
            return Err(GraphError::DuplicateEdge(edge.id));
        }
        for endpoint in [&edge.source, &edge.target] {
            if !self.contains_node(endpoint) {
                return Err(GraphError::DanglingEdge {
                    edge_id: edge.id.clone(),
                    missing_node_id: endpoint.clone(),
                });
            }
        }
        debug!(edge_id = %edge.id, source = %edge.source, target = %edge.target, "add_edge");
        self.edges.push(edge);
        Ok(())
    }

    /// Removes an edge and unselects it. Absent ids are a no-op.
    pub fn delete_edge(&mut self, id: &str) -> Option<CanvasEdge> {
        let index = self.edges.iter().position(|e| e.id == id)?;
        let edge = self.edges.remove(index);
        self.selection.forget_edges([id]);
        debug!(edge_id = id, "delete_edge");
        Some(edge)
    }

    // --- Selection ---

    /// Replaces the node selection. Ids not present in the graph are dropped.
    pub fn set_selected_nodes<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.selection.set_nodes(ids, &self.nodes);
    }

    /// Replaces the edge selection. Ids not present in the graph are dropped.
    pub fn set_selected_edges<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.selection.set_edges(ids, &self.edges);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // --- Integrity ---

    /// Lists every edge endpoint that does not name a node.
    pub fn validate(&self) -> Vec<DanglingEdge> {
        Self::find_dangling(&self.nodes, &self.edges)
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Snapshot for a run. Refuses a graph with dangling edges.
    pub fn snapshot_for_execution(&self) -> Result<GraphSnapshot, GraphError> {
        let dangling = self.validate();
        if dangling.is_empty() {
            Ok(self.snapshot())
        } else {
            Err(GraphError::InvalidGraph(dangling))
        }
    }

    pub(crate) fn find_dangling(nodes: &[CanvasNode], edges: &[CanvasEdge]) -> Vec<DanglingEdge> {
        let ids: AHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        edges
            .iter()
            .flat_map(|e| [(e, &e.source), (e, &e.target)])
            .filter(|(_, endpoint)| !ids.contains(endpoint.as_str()))
            .map(|(e, endpoint)| DanglingEdge {
                edge_id: e.id.clone(),
                missing_node_id: endpoint.clone(),
            })
            .collect()
    }

    fn check_unique_ids(nodes: &[CanvasNode], edges: &[CanvasEdge]) -> Result<(), GraphError> {
        let mut seen = AHashSet::new();
        if let Some(dup) = nodes.iter().find(|n| !seen.insert(n.id.as_str())) {
            return Err(GraphError::DuplicateNode(dup.id.clone()));
        }
        let mut seen = AHashSet::new();
        if let Some(dup) = edges.iter().find(|e| !seen.insert(e.id.as_str())) {
            return Err(GraphError::DuplicateEdge(dup.id.clone()));
        }
        Ok(())
    }
}
