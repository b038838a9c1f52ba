//! Lifecycle status of an analysis task.

use serde::Serialize;
use std::fmt;

/// Status of an analysis task.
///
/// `Idle -> Running -> {Completed, Failed, Cancelled}`. Terminal states are
/// absorbing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task created but not yet started.
    #[default]
    Idle,
    /// Task is executing on its own worker thread.
    Running,
    /// The service returned an analysis and it was delivered.
    Completed,
    /// The request failed and the failure was delivered.
    Failed,
    /// Cancellation was requested; whatever the transport produced was dropped.
    Cancelled,
}

impl TaskStatus {
    /// Returns true if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Returns true if moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        match self {
            Self::Idle => next == Self::Running,
            Self::Running => next.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}
