//! User settings file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use fieldlens_core::config::DEFAULT_BASE_URL;
use fieldlens_core::EndpointConfig;

use crate::error::CliError;

/// Default location of the settings file.
pub const DEFAULT_SETTINGS_PATH: &str = "config/config.json";

/// Settings loaded from `config/config.json`. Missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log at DEBUG instead of INFO.
    pub debug_mode: bool,

    /// Also append logs to this file.
    pub log_file: Option<PathBuf>,

    /// Mode used when `analyze` is given no `--mode`.
    pub default_mode: String,

    /// Analysis service settings.
    pub endpoint: EndpointSettings,
}

/// Endpoint section of the settings file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_mode: false,
            log_file: None,
            default_mode: "validate".to_string(),
            endpoint: EndpointSettings::default(),
        }
    }
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CliError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Endpoint config from these settings; the credential comes from the environment.
    pub fn endpoint_config(&self) -> EndpointConfig {
        EndpointConfig::new(self.endpoint.base_url.clone())
            .with_timeout(Duration::from_secs(self.endpoint.timeout_secs))
            .with_max_retries(self.endpoint.max_retries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.endpoint.max_retries, 3);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = r#"{
            "debug_mode": true,
            "endpoint": {"base_url": "http://localhost:8080", "max_retries": 5}
        }"#;
        file.write_all(json.as_bytes()).unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert!(settings.debug_mode);
        assert_eq!(settings.default_mode, "validate");

        let config = settings.endpoint_config();
        assert_eq!(config.analyze_url(), "http://localhost:8080/analyze");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Parse { .. }));
    }
}
