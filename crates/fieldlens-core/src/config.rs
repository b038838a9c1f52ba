//! Remote analysis endpoint configuration.

use std::time::Duration;

use serde_json::{json, Value};

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "FIELDLENS_API_KEY";

/// Default analysis service base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.example.com/v1";

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum number of attempts per request.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default backoff unit; rate-limit retries wait `2^attempt` of these.
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// Where and how to reach the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Base URL; requests go to `{base_url}/analyze`.
    pub base_url: String,

    /// Bearer credential. `None` means requests carry no auth header.
    pub api_key: Option<String>,

    /// Timeout applied to every attempt.
    pub timeout: Duration,

    /// Maximum attempts, including the first one.
    pub max_retries: u32,

    /// Unit of the exponential rate-limit backoff.
    pub backoff_unit: Duration,
}

impl EndpointConfig {
    /// Create a config for `base_url`, reading the credential from
    /// [`API_KEY_ENV`] if it is set.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_env_lookup(base_url, |name| std::env::var(name).ok())
    }

    /// Like [`EndpointConfig::new`] but with a custom environment lookup.
    pub fn with_env_lookup(
        base_url: impl Into<String>,
        lookup: impl FnOnce(&str) -> Option<String>,
    ) -> Self {
        let api_key = lookup(API_KEY_ENV).filter(|key| !key.trim().is_empty());
        Self {
            base_url: base_url.into(),
            api_key,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }

    /// Builder method to set (or clear) the credential explicitly.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Builder method to set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method to set the attempt budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Builder method to set the backoff unit.
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Full URL of the analyze endpoint.
    pub fn analyze_url(&self) -> String {
        format!("{}/analyze", self.base_url.trim_end_matches('/'))
    }

    /// HTTP headers for analysis requests.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::with_capacity(3);
        if let Some(key) = &self.api_key {
            headers.push(("Authorization", format!("Bearer {}", key)));
        }
        headers.push(("Content-Type", "application/json".to_string()));
        headers.push(("Accept", "application/json".to_string()));
        headers
    }

    /// Delay before the retry that follows a rate-limited `attempt`.
    ///
    /// Grows as `2^attempt` units with no cap other than saturation.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.backoff_unit.saturating_mul(factor)
    }

    /// Displayable summary. Never contains the credential.
    pub fn summary(&self) -> Value {
        json!({
            "api_url": self.base_url,
            "timeout_secs": self.timeout.as_secs_f64(),
            "max_retries": self.max_retries,
            "authenticated": self.api_key.is_some(),
        })
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
