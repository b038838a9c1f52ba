//! Single-attempt call abstraction.

use async_trait::async_trait;

use fieldlens_core::{AnalyzeRequest, EndpointConfig};

use crate::error::CallError;

/// Raw response of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl EndpointResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can perform one `POST /analyze` call.
///
/// Implementations make exactly one attempt and never retry; the timeout in
/// `config` applies to that attempt.
#[async_trait]
pub trait Endpoint: Send + Sync {
    async fn post_analyze(
        &self,
        config: &EndpointConfig,
        body: &AnalyzeRequest<'_>,
    ) -> Result<EndpointResponse, CallError>;
}
