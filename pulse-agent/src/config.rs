//! Configuration for the agent.

use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pulse_common::LoggingConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] json5::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Complete agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Delivery settings.
    pub reporter: ReporterConfig,

    /// Device identity storage.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Delivery endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// URL snapshots are POSTed to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    "http://192.168.10.1:3000/api/stats".to_string()
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

impl ReporterConfig {
    /// Parse the configured endpoint as a URL.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::Validation(format!("invalid endpoint '{}': {}", self.endpoint, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::Validation(format!(
                "endpoint scheme must be http or https, got '{}'",
                other
            ))),
        }
    }
}

/// Device identity storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Path of the device identifier file.
    /// Defaults to `<local data dir>/pulse/device_id`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AgentConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AgentConfig = json5::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reporter.endpoint_url()?;
        Ok(())
    }
}
