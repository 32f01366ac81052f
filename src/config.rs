use crate::board::RegistryOptions;
use crate::error::StoreError;
use crate::model::Category;
use crate::persistence::DEFAULT_STORAGE_KEY;
use serde::Deserialize;
use std::fs;

/// Runtime configuration of a [`crate::CanvasStore`]. Every field has a default,
/// so an empty JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Storage slot the persisted subset is written to.
    pub storage_key: String,
    /// Persist after every mutation of the persisted subset.
    pub write_through: bool,
    pub auto_clear_selection_on_board_switch: bool,
    pub reset_graph_on_active_board_delete: bool,
    /// Category used when nothing has been persisted yet.
    pub default_category: Category,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            write_through: true,
            auto_clear_selection_on_board_switch: true,
            reset_graph_on_active_board_delete: true,
            default_category: Category::default(),
        }
    }
}

impl StoreConfig {
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("Could not read '{}': {}", path, e)))?;
        Self::from_json_str(&content)
    }

    fn validate(&self) -> Result<(), StoreError> {
        if self.storage_key.trim().is_empty() {
            return Err(StoreError::Config("storageKey must not be empty".to_string()));
        }
        Ok(())
    }

    pub(crate) fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            clear_selection_on_switch: self.auto_clear_selection_on_board_switch,
            reset_graph_on_active_delete: self.reset_graph_on_active_board_delete,
        }
    }
}
