//! Durable storage of the persisted subset: boards, assets and the active
//! category. Everything else in the canvas is transient.

mod gateway;
mod snapshot;
mod storage;

pub use gateway::{DEFAULT_STORAGE_KEY, PersistenceGateway};
pub use snapshot::{CURRENT_VERSION, PersistedState, StoredEnvelope, migrate};
pub use storage::{FileStorage, MemoryStorage, StateStorage};
