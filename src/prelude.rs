//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types of the crate. Import it
//! to get the store, the entity model and the error types in one line.
//!
//! # Example
//!
//! ```rust,no_run
//! use canvas_store::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let storage = FileStorage::new("path/to/state");
//! let mut store = CanvasStore::open(StoreConfig::default(), Box::new(storage));
//!
//! let board = store.create_board("Teaser", Category::Video);
//! store.open_board(&board.id)?;
//! store.add_node(CanvasNode::new("clip", "videoGen"))?;
//! store.save_current_board()?;
//! # Ok(())
//! # }
//! ```

// Service object and components
pub use crate::assets::AssetLibrary;
pub use crate::board::BoardRegistry;
pub use crate::canvas::{CanvasStore, Panel, PanelState, StoreEvent, SubscriptionId};
pub use crate::config::StoreConfig;
pub use crate::execution::{ExecutionState, ExecutionTracker};
pub use crate::graph::{GraphSnapshot, GraphStore, Selection};

// Entity model
pub use crate::model::{
    Asset, AssetContent, AssetKind, Board, BoardPatch, CanvasEdge, CanvasNode, Category,
    ExecutionOutcome, ExecutionUpdate, NodeData, NodePatch, NodeStatus, Port, PortType, Position,
    StoryCharacter, StoryData, Viewport, WorkflowExecution,
};

// Boundaries
pub use crate::catalog::{AgentBinding, NodeCatalog, NodeKind};
pub use crate::persistence::{
    DEFAULT_STORAGE_KEY, FileStorage, MemoryStorage, PersistedState, StateStorage,
};

// Error types
pub use crate::error::{
    BoardError, ExecutionError, GraphError, PersistenceError, RemoteError, StoreError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
