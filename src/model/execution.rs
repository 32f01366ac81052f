use super::NodeStatus;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ExecutionOutcome {
    Succeeded,
    Failed { message: String },
    Cancelled,
}

/// Descriptor of one run of the active graph, produced by the execution engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecution {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
    pub started_at: DateTime<Utc>,
    /// Fraction of work done, 0.0..=1.0.
    #[serde(default)]
    pub progress: f32,
    #[serde(default)]
    pub node_statuses: AHashMap<String, NodeStatus>,
}

impl WorkflowExecution {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            board_id: None,
            started_at: Utc::now(),
            progress: 0.0,
            node_statuses: AHashMap::new(),
        }
    }

    pub fn for_board(mut self, board_id: impl Into<String>) -> Self {
        self.board_id = Some(board_id.into());
        self
    }
}

/// A status report streamed by the engine while a run is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionUpdate {
    NodeStatus { node_id: String, status: NodeStatus },
    Progress(f32),
    Finished(ExecutionOutcome),
}
