//! Configuration file handling

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Where the Janus ZeroMQ transport listens
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Connection settings
#[derive(Debug, Deserialize)]
pub struct ConnectionConfig {
    /// Endpoint as `host:port` or `tcp://host:port`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

fn default_endpoint() -> String {
    "tcp://127.0.0.1:5545".to_string()
}

/// Timeout settings in milliseconds
#[derive(Debug, Deserialize)]
pub struct Timeouts {
    /// How long to wait for each reply
    #[serde(default = "default_receive")]
    pub receive_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            receive_ms: default_receive(),
        }
    }
}

fn default_receive() -> u64 {
    5000
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;
        if config.timeouts.receive_ms == 0 {
            return Err(super::Error::Config(
                "timeouts.receive_ms must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// Apply command-line overrides on top of the file values
    pub fn with_overrides(mut self, endpoint: Option<String>, timeout_ms: Option<u64>) -> Result<Self> {
        if let Some(endpoint) = endpoint {
            self.connection.endpoint = endpoint;
        }
        if let Some(timeout_ms) = timeout_ms {
            if timeout_ms == 0 {
                return Err(super::Error::Config(
                    "--timeout-ms must be greater than zero".to_string(),
                ));
            }
            self.timeouts.receive_ms = timeout_ms;
        }
        Ok(self)
    }

    /// Receive timeout as a Duration
    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.receive_ms)
    }
}
