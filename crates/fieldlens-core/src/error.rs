//! Core domain errors.

use thiserror::Error;

/// Core domain errors for FieldLens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Invalid input (bad metric shape, missing coordinates, ...).
    #[error("{0}")]
    InvalidInput(String),

    /// Invalid state transition.
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },
}
