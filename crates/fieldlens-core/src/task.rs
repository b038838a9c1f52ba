//! Bookkeeping for an analysis task.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CoreError;
use crate::outcome::TerminalOutcome;
use crate::{TaskId, TaskStatus};

/// Snapshot of an analysis task's lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSummary {
    /// Unique task identifier.
    pub task_id: TaskId,

    /// Current status.
    pub status: TaskStatus,

    /// When the task was started.
    pub started_at: Option<DateTime<Utc>>,

    /// When the task reached a terminal state.
    pub finished_at: Option<DateTime<Utc>>,

    /// User-facing failure message, if the task failed.
    pub error_message: Option<String>,
}

impl TaskSummary {
    /// Create a summary for an idle task.
    pub fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            status: TaskStatus::Idle,
            started_at: None,
            finished_at: None,
            error_message: None,
        }
    }

    /// Mark the task as running.
    pub fn start(&mut self) -> Result<(), CoreError> {
        self.transition(TaskStatus::Running)?;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Record the terminal outcome.
    ///
    /// Fails if the task already finished, so an outcome is recorded at most once.
    pub fn finish(&mut self, outcome: &TerminalOutcome) -> Result<(), CoreError> {
        let next = match outcome {
            TerminalOutcome::Success(_) => TaskStatus::Completed,
            TerminalOutcome::Failure(_) => TaskStatus::Failed,
            TerminalOutcome::Cancelled => TaskStatus::Cancelled,
        };
        self.transition(next)?;
        self.finished_at = Some(Utc::now());
        if let TerminalOutcome::Failure(_) = outcome {
            self.error_message = outcome.user_message();
        }
        Ok(())
    }

    fn transition(&mut self, next: TaskStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidStateTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}
