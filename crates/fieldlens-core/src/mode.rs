//! Analysis modes understood by the remote service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which kind of analysis to ask for.
///
/// Unknown names are kept verbatim in [`AnalysisMode::Other`] and sent as the
/// `analysis_type`; the prompt for them carries no mode-specific instructions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnalysisMode {
    /// Check signature, symmetry and physical consistency.
    Validate,
    /// Explain what spacetime the metric describes.
    Interpret,
    /// Propose modifications and related metrics.
    Suggest,
    /// Any other analysis type.
    Other(String),
}

impl AnalysisMode {
    /// Wire name sent as `analysis_type`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Validate => "validate",
            Self::Interpret => "interpret",
            Self::Suggest => "suggest",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for AnalysisMode {
    fn from(s: &str) -> Self {
        match s {
            "validate" => Self::Validate,
            "interpret" => Self::Interpret,
            "suggest" => Self::Suggest,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for AnalysisMode {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<AnalysisMode> for String {
    fn from(mode: AnalysisMode) -> Self {
        mode.as_str().to_string()
    }
}

impl FromStr for AnalysisMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
