//! Immutable description of one analysis request.

use serde::Serialize;

use crate::config::EndpointConfig;
use crate::mode::AnalysisMode;
use crate::payload::MetricPayload;

/// What to analyze and how to reach the service.
///
/// Built once by the host and handed to a single analysis task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    payload: MetricPayload,
    mode: AnalysisMode,
    endpoint: EndpointConfig,
}

impl RequestDescriptor {
    /// Create a new descriptor.
    pub fn new(
        payload: MetricPayload,
        mode: impl Into<AnalysisMode>,
        endpoint: EndpointConfig,
    ) -> Self {
        Self {
            payload,
            mode: mode.into(),
            endpoint,
        }
    }

    /// The metric being analyzed.
    pub fn payload(&self) -> &MetricPayload {
        &self.payload
    }

    /// Requested analysis mode.
    pub fn mode(&self) -> &AnalysisMode {
        &self.mode
    }

    /// Service endpoint settings.
    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// JSON body of `POST /analyze` for the given prompt.
    pub fn request_body<'a>(&'a self, prompt: &'a str) -> AnalyzeRequest<'a> {
        AnalyzeRequest {
            prompt,
            metric_data: &self.payload,
            analysis_type: self.mode.as_str(),
        }
    }
}

/// Wire body of the analyze call.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub prompt: &'a str,
    pub metric_data: &'a MetricPayload,
    pub analysis_type: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let payload = MetricPayload::new(
            vec![vec!["-1".into(), "".into()], vec!["0".into(), "1".into()]],
            2,
            vec!["t".into(), "x".into()],
        )
        .unwrap();
        let descriptor = RequestDescriptor::new(
            payload,
            "interpret",
            EndpointConfig::default().with_api_key(None),
        );

        let body = serde_json::to_value(descriptor.request_body("hello")).unwrap();
        assert_eq!(
            body,
            json!({
                "prompt": "hello",
                "metric_data": {
                    "components": [["-1", "0"], ["0", "1"]],
                    "dimension": 2,
                    "coordinates": ["t", "x"],
                },
                "analysis_type": "interpret",
            })
        );
    }
}
