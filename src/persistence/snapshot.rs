use crate::error::PersistenceError;
use crate::model::{Asset, Board, Category};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Version written by this build.
pub const CURRENT_VERSION: u32 = 1;

/// The only part of the canvas that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub boards: Vec<Board>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub active_category: Category,
}

/// On-disk wrapper: `{ "state": {...}, "version": N }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEnvelope {
    pub state: Value,
    #[serde(default)]
    pub version: u32,
}

type Migration = fn(Value) -> Result<Value, PersistenceError>;

/// Steps indexed by the version they upgrade from.
const MIGRATIONS: &[(u32, Migration)] = &[(0, migrate_v0_to_v1)];

/// Upgrades a stored `state` from `version` to [`CURRENT_VERSION`].
pub fn migrate(mut state: Value, mut version: u32) -> Result<Value, PersistenceError> {
    if version > CURRENT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: version,
            supported: CURRENT_VERSION,
        });
    }
    while version < CURRENT_VERSION {
        let (_, step) = MIGRATIONS
            .iter()
            .find(|(from, _)| *from == version)
            .ok_or(PersistenceError::Migration(version))?;
        state = step(state)?;
        version += 1;
    }
    Ok(state)
}

// v0 payloads predate category filtering and may omit the collections.
fn migrate_v0_to_v1(mut state: Value) -> Result<Value, PersistenceError> {
    let Some(object) = state.as_object_mut() else {
        return Err(PersistenceError::Migration(0));
    };
    object.entry("boards").or_insert_with(|| json!([]));
    object.entry("assets").or_insert_with(|| json!([]));
    object
        .entry("activeCategory")
        .or_insert_with(|| json!(Category::default()));
    Ok(state)
}
