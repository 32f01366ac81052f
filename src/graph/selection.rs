use crate::model::{CanvasEdge, CanvasNode};
use ahash::AHashSet;
use itertools::Itertools;

/// Ids of the currently selected nodes and edges, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    nodes: Vec<String>,
    edges: Vec<String>,
}

impl Selection {
    pub fn selected_nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn selected_edges(&self) -> &[String] {
        &self.edges
    }

    pub fn is_node_selected(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n == id)
    }

    pub fn is_edge_selected(&self, id: &str) -> bool {
        self.edges.iter().any(|e| e == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub(crate) fn set_nodes<I>(&mut self, ids: I, graph_nodes: &[CanvasNode])
    where
        I: IntoIterator<Item = String>,
    {
        let present: AHashSet<&str> = graph_nodes.iter().map(|n| n.id.as_str()).collect();
        self.nodes = ids
            .into_iter()
            .filter(|id| present.contains(id.as_str()))
            .unique()
            .collect();
    }

    pub(crate) fn set_edges<I>(&mut self, ids: I, graph_edges: &[CanvasEdge])
    where
        I: IntoIterator<Item = String>,
    {
        let present: AHashSet<&str> = graph_edges.iter().map(|e| e.id.as_str()).collect();
        self.edges = ids
            .into_iter()
            .filter(|id| present.contains(id.as_str()))
            .unique()
            .collect();
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    pub(crate) fn forget_node(&mut self, id: &str) {
        self.nodes.retain(|n| n != id);
    }

    pub(crate) fn forget_edges<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let removed: AHashSet<&str> = ids.into_iter().collect();
        self.edges.retain(|e| !removed.contains(e.as_str()));
    }

    /// Drops every selected id that no longer names a node or edge.
    /// Returns how many ids were pruned.
    pub(crate) fn reconcile(&mut self, nodes: &[CanvasNode], edges: &[CanvasEdge]) -> usize {
        let before = self.nodes.len() + self.edges.len();
        let node_ids: AHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let edge_ids: AHashSet<&str> = edges.iter().map(|e| e.id.as_str()).collect();
        self.nodes.retain(|n| node_ids.contains(n.as_str()));
        self.edges.retain(|e| edge_ids.contains(e.as_str()));
        before - (self.nodes.len() + self.edges.len())
    }
}
