//! Error types for analysis task management.

use thiserror::Error;

use fieldlens_core::CoreError;

/// Errors returned to the host when driving an [`crate::AnalysisTask`].
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The task is not in a state that allows the operation.
    #[error(transparent)]
    InvalidState(#[from] CoreError),

    /// The worker thread could not be spawned.
    #[error("Failed to spawn analysis thread: {0}")]
    SpawnError(#[from] std::io::Error),
}
