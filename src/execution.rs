//! Passive record of the run the external engine is performing.
//!
//! The engine is the only writer. The tracker never decides when a run ends;
//! it records the transitions it is told about. `is_executing` is derived from
//! the state, so it can never disagree with `current_execution`.

use crate::error::ExecutionError;
use crate::model::{ExecutionOutcome, ExecutionUpdate, WorkflowExecution};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ExecutionState {
    #[default]
    Idle,
    Running(WorkflowExecution),
}

#[derive(Debug, Clone, Default)]
pub struct ExecutionTracker {
    state: ExecutionState,
    last_outcome: Option<ExecutionOutcome>,
}

impl ExecutionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn current_execution(&self) -> Option<&WorkflowExecution> {
        match &self.state {
            ExecutionState::Running(execution) => Some(execution),
            ExecutionState::Idle => None,
        }
    }

    pub fn is_executing(&self) -> bool {
        matches!(self.state, ExecutionState::Running(_))
    }

    /// Outcome reported for the most recent run. `None` if that run was
    /// cleared through a slot setter instead of finishing.
    pub fn last_outcome(&self) -> Option<&ExecutionOutcome> {
        self.last_outcome.as_ref()
    }

    /// Records the start of a run.
    pub fn begin(&mut self, execution: WorkflowExecution) -> Result<(), ExecutionError> {
        if let ExecutionState::Running(running) = &self.state {
            return Err(ExecutionError::AlreadyRunning(running.id.clone()));
        }
        info!(execution_id = %execution.id, "execution started");
        self.state = ExecutionState::Running(execution);
        Ok(())
    }

    /// Records the end of the current run. Returns the finished descriptor, or
    /// `None` if nothing was running.
    pub fn finish(&mut self, outcome: ExecutionOutcome) -> Option<WorkflowExecution> {
        match std::mem::take(&mut self.state) {
            ExecutionState::Running(execution) => {
                info!(execution_id = %execution.id, ?outcome, "execution finished");
                self.last_outcome = Some(outcome);
                Some(execution)
            }
            ExecutionState::Idle => None,
        }
    }

    /// Applies a status update streamed by the engine for `execution_id`.
    pub fn apply(
        &mut self,
        execution_id: &str,
        update: ExecutionUpdate,
    ) -> Result<(), ExecutionError> {
        let execution = match &mut self.state {
            ExecutionState::Running(execution) if execution.id == execution_id => execution,
            ExecutionState::Running(execution) => {
                return Err(ExecutionError::ExecutionMismatch {
                    running: execution.id.clone(),
                    received: execution_id.to_string(),
                });
            }
            ExecutionState::Idle => return Err(ExecutionError::NoExecution),
        };

        match update {
            ExecutionUpdate::NodeStatus { node_id, status } => {
                debug!(execution_id, node_id = %node_id, ?status, "node status");
                execution.node_statuses.insert(node_id, status);
            }
            ExecutionUpdate::Progress(progress) => {
                execution.progress = progress.clamp(0.0, 1.0);
            }
            ExecutionUpdate::Finished(outcome) => {
                self.finish(outcome);
            }
        }
        Ok(())
    }

    /// Slot-style setter: `Some` marks a run in flight, `None` marks it over.
    /// Replacing one descriptor with another is allowed here, because the
    /// engine may re-issue the descriptor for the same run.
    pub fn set_current_execution(&mut self, execution: Option<WorkflowExecution>) {
        match execution {
            Some(execution) => {
                debug!(execution_id = %execution.id, "set_current_execution");
                self.state = ExecutionState::Running(execution);
            }
            None => self.clear(),
        }
    }

    /// Slot-style flag setter. `true` requires a descriptor to already be
    /// present; `false` returns to idle.
    pub fn set_is_executing(&mut self, executing: bool) -> Result<(), ExecutionError> {
        match (executing, self.is_executing()) {
            (true, true) | (false, false) => Ok(()),
            (true, false) => Err(ExecutionError::NoExecution),
            (false, true) => {
                self.clear();
                Ok(())
            }
        }
    }

    // The slot setters carry no outcome, so none is recorded.
    fn clear(&mut self) {
        if let ExecutionState::Running(execution) = std::mem::take(&mut self.state) {
            info!(execution_id = %execution.id, "execution cleared without outcome");
            self.last_outcome = None;
        }
    }
}
