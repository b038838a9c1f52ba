//! Terminal outcomes of an analysis request.

use thiserror::Error;

/// Text reported when the service answers without an `analysis` field.
pub const MISSING_ANALYSIS_PLACEHOLDER: &str = "No analysis provided";

/// Why an analysis request failed.
///
/// This is the closed set of failures a host ever sees; every lower-level
/// fault is folded into one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// The service kept answering HTTP 429 until the attempt budget ran out.
    #[error("rate limited by the analysis service")]
    RateLimited,

    /// Every attempt timed out.
    #[error("request to the analysis service timed out")]
    TimedOut,

    /// Non-retryable HTTP status.
    #[error("analysis service returned HTTP {0}")]
    ServerError(u16),

    /// Connection, protocol or response-decoding fault.
    #[error("transport error: {0}")]
    TransportError(String),
}

impl FailureReason {
    /// Returns true for failures the transport retries before giving up.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::TimedOut)
    }
}

/// The single final result of an analysis task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalOutcome {
    /// Analysis text from the service.
    Success(String),
    /// The request failed.
    Failure(FailureReason),
    /// Cancellation suppressed the result.
    Cancelled,
}

impl TerminalOutcome {
    /// Message shown to the user, or `None` when nothing should be reported.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Success(text) => Some(text.clone()),
            Self::Failure(reason) => Some(format!("Analysis failed: {}", reason)),
            Self::Cancelled => None,
        }
    }
}

impl From<Result<String, FailureReason>> for TerminalOutcome {
    fn from(result: Result<String, FailureReason>) -> Self {
        match result {
            Ok(text) => Self::Success(text),
            Err(reason) => Self::Failure(reason),
        }
    }
}
