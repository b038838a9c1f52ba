//! CLI errors.

use std::path::PathBuf;

use thiserror::Error;

use fieldlens_core::CoreError;

#[derive(Debug, Error)]
pub enum CliError {
    /// Settings or metric file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents are not valid JSON for the expected shape.
    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The metric itself is invalid.
    #[error(transparent)]
    Metric(#[from] CoreError),
}
