//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Coverage service binding
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_service")]
    pub service: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://ows.rasdaman.org/rasdaman/ows".to_string()
}

fn default_service() -> String {
    "WCS".to_string()
}

fn default_version() -> String {
    "2.0.1".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            service: default_service(),
            version: default_version(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("datacube").join("config.toml")),
            Some(PathBuf::from("/etc/datacube/config.toml")),
            Some(PathBuf::from("./datacube.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply `DATACUBE_*` overrides from a variable lookup
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = var("DATACUBE_ENDPOINT") {
            self.service.endpoint = endpoint;
        }
        if let Some(service) = var("DATACUBE_SERVICE") {
            self.service.service = service;
        }
        if let Some(version) = var("DATACUBE_VERSION") {
            self.service.version = version;
        }
        if let Some(timeout) = var("DATACUBE_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => self.service.request_timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid DATACUBE_TIMEOUT_SECS: {}", timeout),
            }
        }

        if let Some(level) = var("DATACUBE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("DATACUBE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Datacube Configuration
#
# Environment variables override these settings:
# - DATACUBE_ENDPOINT
# - DATACUBE_SERVICE
# - DATACUBE_VERSION
# - DATACUBE_TIMEOUT_SECS
# - DATACUBE_LOG_LEVEL
# - DATACUBE_LOG_FORMAT

[service]
# OWS endpoint of the coverage service
endpoint = "https://ows.rasdaman.org/rasdaman/ows"

# Service name and protocol version
service = "WCS"
version = "2.0.1"

# Request timeout in seconds
request_timeout_secs = 60

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
