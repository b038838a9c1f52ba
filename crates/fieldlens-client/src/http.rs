//! HTTP implementation of [`Endpoint`].

use async_trait::async_trait;
use tracing::debug;

use fieldlens_core::{AnalyzeRequest, EndpointConfig};

use crate::endpoint::{Endpoint, EndpointResponse};
use crate::error::CallError;

/// reqwest-backed endpoint.
#[derive(Debug, Clone, Default)]
pub struct HttpEndpoint {
    inner: reqwest::Client,
}

impl HttpEndpoint {
    /// Create a new HTTP endpoint.
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Endpoint for HttpEndpoint {
    async fn post_analyze(
        &self,
        config: &EndpointConfig,
        body: &AnalyzeRequest<'_>,
    ) -> Result<EndpointResponse, CallError> {
        let url = config.analyze_url();
        debug!(url = %url, analysis_type = %body.analysis_type, "POST request");

        let mut request = self.inner.post(&url).timeout(config.timeout);
        for (name, value) in config.headers() {
            request = request.header(name, value);
        }

        let response = request.json(body).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        debug!(status, bytes = text.len(), "Received response");
        Ok(EndpointResponse::new(status, text))
    }
}
