//! Retrying transport for analysis requests.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use fieldlens_core::{FailureReason, RequestDescriptor, MISSING_ANALYSIS_PLACEHOLDER};

use crate::endpoint::Endpoint;
use crate::error::CallError;

const HTTP_TOO_MANY_REQUESTS: u16 = 429;

/// Attempt counter for one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    /// 1-based attempt number.
    pub attempt: u32,
}

impl RetryState {
    /// State before the first attempt.
    pub fn new() -> Self {
        Self { attempt: 1 }
    }

    /// Returns true if another attempt fits in the budget.
    pub fn can_retry(&self, max_retries: u32) -> bool {
        self.attempt < max_retries
    }

    /// Move to the next attempt.
    pub fn advance(&mut self) {
        self.attempt += 1;
    }
}

impl Default for RetryState {
    fn default() -> Self {
        Self::new()
    }
}

/// Performs one logical analysis call with transient-failure recovery.
///
/// - 2xx: the `analysis` field of the JSON body (placeholder if missing).
/// - 429: wait `2^attempt` backoff units and retry while attempts remain.
/// - timeout: retry immediately while attempts remain.
/// - anything else: fail at once.
#[derive(Clone)]
pub struct RetryingTransport {
    endpoint: Arc<dyn Endpoint>,
}

impl RetryingTransport {
    /// Create a transport over `endpoint`.
    pub fn new(endpoint: Arc<dyn Endpoint>) -> Self {
        Self { endpoint }
    }

    /// Send `prompt` for `descriptor`, retrying as configured.
    pub async fn send(
        &self,
        descriptor: &RequestDescriptor,
        prompt: &str,
    ) -> Result<String, FailureReason> {
        let config = descriptor.endpoint();
        let body = descriptor.request_body(prompt);
        let mut state = RetryState::new();

        loop {
            debug!(
                attempt = state.attempt,
                max_retries = config.max_retries,
                "Sending analysis request"
            );

            let reason = match self.endpoint.post_analyze(config, &body).await {
                Ok(response) if response.is_success() => {
                    info!(
                        attempt = state.attempt,
                        status = response.status,
                        "Analysis request succeeded"
                    );
                    return extract_analysis(&response.body);
                }
                Ok(response) if response.status == HTTP_TOO_MANY_REQUESTS => {
                    FailureReason::RateLimited
                }
                Ok(response) => FailureReason::ServerError(response.status),
                Err(CallError::Timeout) => FailureReason::TimedOut,
                Err(CallError::Transport(detail)) => FailureReason::TransportError(detail),
            };

            if !reason.is_retryable() {
                warn!(attempt = state.attempt, reason = %reason, "Analysis request failed");
                return Err(reason);
            }
            if !state.can_retry(config.max_retries) {
                warn!(attempt = state.attempt, reason = %reason, "Retries exhausted");
                return Err(reason);
            }

            if reason == FailureReason::RateLimited {
                let delay = config.backoff_delay(state.attempt);
                warn!(
                    attempt = state.attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
            } else {
                warn!(attempt = state.attempt, reason = %reason, "Retrying immediately");
            }
            state.advance();
        }
    }
}

/// Pull the `analysis` field out of a success body.
fn extract_analysis(body: &str) -> Result<String, FailureReason> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| FailureReason::TransportError(format!("invalid response body: {}", e)))?;

    match value.get("analysis") {
        Some(Value::String(text)) => Ok(text.clone()),
        None | Some(Value::Null) => Ok(MISSING_ANALYSIS_PLACEHOLDER.to_string()),
        Some(other) => Ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use fieldlens_core::{AnalyzeRequest, EndpointConfig, MetricPayload};

    use crate::endpoint::EndpointResponse;

    /// Replays a fixed script of results and records when each call happened.
    struct ScriptedEndpoint {
        script: Mutex<VecDeque<Result<EndpointResponse, CallError>>>,
        fallback: Result<EndpointResponse, CallError>,
        calls: Mutex<Vec<Instant>>,
    }

    impl ScriptedEndpoint {
        fn new(
            script: Vec<Result<EndpointResponse, CallError>>,
            fallback: Result<EndpointResponse, CallError>,
        ) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                fallback,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn always(result: Result<EndpointResponse, CallError>) -> Arc<Self> {
            Self::new(Vec::new(), result)
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn gaps(&self) -> Vec<Duration> {
            let calls = self.calls.lock().unwrap();
            calls.windows(2).map(|w| w[1] - w[0]).collect()
        }

        /// Asserts the delays between calls, allowing for timer tick rounding.
        fn assert_gaps(&self, expected: &[Duration]) {
            let gaps = self.gaps();
            assert_eq!(gaps.len(), expected.len(), "gaps: {:?}", gaps);
            for (gap, want) in gaps.iter().zip(expected) {
                assert!(
                    *gap >= *want && *gap < *want + Duration::from_millis(5),
                    "expected {:?}, got {:?}",
                    want,
                    gap
                );
            }
        }
    }

    #[async_trait]
    impl Endpoint for ScriptedEndpoint {
        async fn post_analyze(
            &self,
            _config: &EndpointConfig,
            _body: &AnalyzeRequest<'_>,
        ) -> Result<EndpointResponse, CallError> {
            self.calls.lock().unwrap().push(Instant::now());
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| self.fallback.clone())
        }
    }

    const UNIT: Duration = Duration::from_millis(100);

    fn descriptor(max_retries: u32) -> RequestDescriptor {
        let payload = MetricPayload::new(
            vec![vec!["-1".into(), "0".into()], vec!["0".into(), "1".into()]],
            2,
            vec!["t".into(), "x".into()],
        )
        .unwrap();
        let config = EndpointConfig::new("http://analysis.test")
            .with_api_key(None)
            .with_max_retries(max_retries)
            .with_backoff_unit(UNIT);
        RequestDescriptor::new(payload, "validate", config)
    }

    fn ok(body: &str) -> Result<EndpointResponse, CallError> {
        Ok(EndpointResponse::new(200, body))
    }

    fn status(code: u16) -> Result<EndpointResponse, CallError> {
        Ok(EndpointResponse::new(code, ""))
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_try() {
        let endpoint = ScriptedEndpoint::always(ok(r#"{"analysis":"Minkowski space"}"#));
        let transport = RetryingTransport::new(endpoint.clone());

        let text = transport.send(&descriptor(3), "prompt").await.unwrap();
        assert_eq!(text, "Minkowski space");
        assert_eq!(endpoint.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_then_success_backs_off_exponentially() {
        // k = 3 rate limits within a budget of 5 attempts.
        let endpoint = ScriptedEndpoint::new(
            vec![status(429), status(429), status(429)],
            ok(r#"{"analysis":"done"}"#),
        );
        let transport = RetryingTransport::new(endpoint.clone());

        let text = transport.send(&descriptor(5), "prompt").await.unwrap();
        assert_eq!(text, "done");
        assert_eq!(endpoint.call_count(), 4);
        endpoint.assert_gaps(&[UNIT * 2, UNIT * 4, UNIT * 8]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_rate_limited_stops_at_budget() {
        let endpoint = ScriptedEndpoint::always(status(429));
        let transport = RetryingTransport::new(endpoint.clone());

        let err = transport.send(&descriptor(3), "prompt").await.unwrap_err();
        assert_eq!(err, FailureReason::RateLimited);
        assert_eq!(endpoint.call_count(), 3);
        endpoint.assert_gaps(&[UNIT * 2, UNIT * 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_error_is_not_retried() {
        let endpoint = ScriptedEndpoint::always(status(500));
        let transport = RetryingTransport::new(endpoint.clone());

        let err = transport.send(&descriptor(3), "prompt").await.unwrap_err();
        assert_eq!(err, FailureReason::ServerError(500));
        assert_eq!(endpoint.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_retries_immediately() {
        let endpoint = ScriptedEndpoint::new(
            vec![Err(CallError::Timeout), Err(CallError::Timeout)],
            ok(r#"{"analysis":"after timeouts"}"#),
        );
        let transport = RetryingTransport::new(endpoint.clone());

        let text = transport.send(&descriptor(3), "prompt").await.unwrap();
        assert_eq!(text, "after timeouts");
        assert_eq!(endpoint.call_count(), 3);
        endpoint.assert_gaps(&[Duration::ZERO, Duration::ZERO]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_exhaustion() {
        let endpoint = ScriptedEndpoint::always(Err(CallError::Timeout));
        let transport = RetryingTransport::new(endpoint.clone());

        let err = transport.send(&descriptor(3), "prompt").await.unwrap_err();
        assert_eq!(err, FailureReason::TimedOut);
        assert_eq!(endpoint.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_is_not_retried() {
        let refused = Err(CallError::Transport("connection refused".into()));
        let endpoint = ScriptedEndpoint::always(refused);
        let transport = RetryingTransport::new(endpoint.clone());

        let err = transport.send(&descriptor(3), "prompt").await.unwrap_err();
        assert_eq!(
            err,
            FailureReason::TransportError("connection refused".into())
        );
        assert_eq!(endpoint.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_analysis_field_uses_placeholder() {
        let endpoint = ScriptedEndpoint::always(ok(r#"{"status":"ok"}"#));
        let transport = RetryingTransport::new(endpoint);

        let text = transport.send(&descriptor(3), "prompt").await.unwrap();
        assert_eq!(text, MISSING_ANALYSIS_PLACEHOLDER);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_body_is_transport_error() {
        let endpoint = ScriptedEndpoint::always(ok("<html>oops</html>"));
        let transport = RetryingTransport::new(endpoint.clone());

        let err = transport.send(&descriptor(3), "prompt").await.unwrap_err();
        let detail = match err {
            FailureReason::TransportError(detail) => detail,
            other => panic!("unexpected failure: {:?}", other),
        };
        assert!(detail.starts_with("invalid response body"));
        assert_eq!(endpoint.call_count(), 1);
    }

    #[test]
    fn test_retry_state() {
        let mut state = RetryState::new();
        assert_eq!(state.attempt, 1);
        assert!(state.can_retry(2));
        state.advance();
        assert!(!state.can_retry(2));
        assert!(!RetryState::new().can_retry(1));
    }
}
