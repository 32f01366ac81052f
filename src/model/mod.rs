pub mod asset;
pub mod board;
pub mod edge;
pub mod execution;
pub mod node;

pub use asset::*;
pub use board::*;
pub use edge::*;
pub use execution::*;
pub use node::*;
