//! Error types for a single call to the analysis service.

use thiserror::Error;

/// Why one attempt produced no HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// The per-call timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// Connection, TLS or body-read failure.
    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for CallError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}
