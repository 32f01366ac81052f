//! # Canvas Store - Graph State for Node-Based Editors
//!
//! **canvas-store** is the authoritative in-memory model behind a visual,
//! node-based editor: boards that hold graphs of nodes and edges, the current
//! selection, the status of a run performed by an external execution engine,
//! a library of produced assets, and the persistence boundary for all of it.
//!
//! ## Core Workflow
//!
//! 1.  **Open the store**: [`CanvasStore::open`] rehydrates boards, assets and
//!     the active category from a [`persistence::StateStorage`] backend.
//! 2.  **Edit the graph**: add, update and delete nodes and edges. Deleting a
//!     node removes every edge touching it and unselects both in one step;
//!     edges whose endpoints are missing are rejected.
//! 3.  **Save boards**: the live graph is a working copy. Write it back with
//!     [`CanvasStore::save_current_board`]; board changes are persisted
//!     immediately.
//! 4.  **Run**: hand [`CanvasStore::start_execution`]'s snapshot to the engine
//!     and forward its updates through [`CanvasStore::apply_execution_update`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use canvas_store::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut store = CanvasStore::in_memory();
//!     let catalog = NodeCatalog::default();
//!
//!     let board = store.create_board("Look A", Category::Fashion);
//!     store.open_board(&board.id)?;
//!
//!     let prompt = catalog
//!         .instantiate("textPrompt", "prompt", Position::new(0.0, 0.0))
//!         .ok_or("unknown node kind")?;
//!     let image = catalog
//!         .instantiate("imageGen", "image", Position::new(240.0, 0.0))
//!         .ok_or("unknown node kind")?;
//!     store.add_node(prompt)?;
//!     store.add_node(image)?;
//!     store.add_edge(CanvasEdge::new("e1", "prompt", "image").with_handles("text", "prompt"))?;
//!
//!     store.save_current_board()?;
//!
//!     let snapshot = store.start_execution(WorkflowExecution::new("run-1"))?;
//!     println!("running {} nodes", snapshot.nodes.len());
//!     store.apply_execution_update(
//!         "run-1",
//!         ExecutionUpdate::Finished(ExecutionOutcome::Succeeded),
//!     )?;
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod board;
pub mod canvas;
pub mod catalog;
pub mod config;
pub mod error;
pub mod execution;
pub mod graph;
pub mod model;
pub mod persistence;
pub mod prelude;
pub mod remote;

pub use canvas::CanvasStore;
