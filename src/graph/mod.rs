//! The live working graph and its selection.
//!
//! The [`GraphStore`] exclusively owns the node and edge lists of the active
//! canvas. Every mutation path keeps two rules:
//!
//! 1. Each edge's `source` and `target` name a node in the graph, except in the
//!    documented window between [`GraphStore::set_nodes`] and
//!    [`GraphStore::set_edges`] (use [`GraphStore::load_graph`] to avoid it).
//! 2. Each selected id names a node or edge that is currently present.

mod selection;
mod store;

pub use selection::Selection;
pub use store::{GraphSnapshot, GraphStore, NodeRemoval};
