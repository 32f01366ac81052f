use super::snapshot::{CURRENT_VERSION, PersistedState, StoredEnvelope, migrate};
use super::storage::StateStorage;
use crate::error::PersistenceError;
use tracing::{debug, warn};

/// Storage key used when the configuration does not name one.
pub const DEFAULT_STORAGE_KEY: &str = "canvas-storage";

/// Serializes the persisted subset under one storage key and reads it back.
pub struct PersistenceGateway {
    storage: Box<dyn StateStorage>,
    key: String,
}

impl PersistenceGateway {
    pub fn new(storage: Box<dyn StateStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Encodes `state` into the versioned envelope.
    pub fn encode(state: &PersistedState) -> Result<String, PersistenceError> {
        let envelope = StoredEnvelope {
            state: serde_json::to_value(state).map_err(PersistenceError::Serialize)?,
            version: CURRENT_VERSION,
        };
        serde_json::to_string(&envelope).map_err(PersistenceError::Serialize)
    }

    /// Decodes and migrates a stored payload.
    pub fn decode(payload: &str) -> Result<PersistedState, PersistenceError> {
        let envelope: StoredEnvelope =
            serde_json::from_str(payload).map_err(PersistenceError::Deserialize)?;
        let state = migrate(envelope.state, envelope.version)?;
        serde_json::from_value(state).map_err(PersistenceError::Deserialize)
    }

    pub fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        let payload = Self::encode(state)?;
        self.storage.write(&self.key, &payload)?;
        debug!(
            key = %self.key,
            boards = state.boards.len(),
            assets = state.assets.len(),
            "persisted state"
        );
        Ok(())
    }

    /// Reads the stored state. `Ok(None)` when nothing has been saved yet.
    pub fn try_load(&self) -> Result<Option<PersistedState>, PersistenceError> {
        match self.storage.read(&self.key)? {
            Some(payload) => Self::decode(&payload).map(Some),
            None => Ok(None),
        }
    }

    /// Reads the stored state, falling back to an empty state on any failure.
    pub fn load(&self) -> PersistedState {
        match self.try_load() {
            Ok(Some(state)) => state,
            Ok(None) => PersistedState::default(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding unreadable persisted state");
                PersistedState::default()
            }
        }
    }

    pub fn clear(&self) -> Result<(), PersistenceError> {
        self.storage.remove(&self.key)
    }
}

impl std::fmt::Debug for PersistenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceGateway")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
