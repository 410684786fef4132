//! Server configuration management.
//!
//! Handles loading configuration from TOML files, environment variables, and
//! CLI arguments, with CLI taking precedence over environment over file over
//! defaults.

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port number: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid fetch timeout: must be greater than zero")]
    InvalidFetchTimeout,

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels supported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to a tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Server configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Log level.
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// URL of the public key-rate table (CSV, TSV or JSON). When unset, the
    /// server runs with an empty schedule and `/calc395` answers 503.
    pub rates_url: Option<String>,
    /// Seconds between refreshes of the rates source.
    pub refresh_interval_secs: u64,
    /// Bound on a single rates fetch, in seconds.
    pub fetch_timeout_secs: u64,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: LogLevel::Info,
            rates_url: None,
            refresh_interval_secs: 6 * 60 * 60,
            fetch_timeout_secs: 20,
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `CALC395_*` environment variables.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var("CALC395_HOST") {
            self.host = host;
        }
        if let Ok(port_str) = std::env::var("CALC395_PORT") {
            self.port = port_str.parse().map_err(|_| ConfigError::InvalidPort(0))?;
        }
        if let Ok(log_level) = std::env::var("CALC395_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&log_level)?;
        }
        if let Ok(url) = std::env::var("CALC395_RATES_URL") {
            self.rates_url = Some(url);
        }
        if let Ok(secs) = std::env::var("CALC395_REFRESH_SECS") {
            self.refresh_interval_secs = secs.parse().unwrap_or(self.refresh_interval_secs);
        }
        if let Ok(secs) = std::env::var("CALC395_FETCH_TIMEOUT_SECS") {
            self.fetch_timeout_secs = secs.parse().unwrap_or(self.fetch_timeout_secs);
        }
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::InvalidFetchTimeout);
        }
        Ok(())
    }

    /// Get the socket address string.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Merge with CLI arguments (CLI takes precedence).
    pub fn merge_with_cli(&mut self, cli: &CliArgs) {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(log_level) = &cli.log_level {
            if let Ok(level) = LogLevel::from_str(log_level) {
                self.log_level = level;
            }
        }
        if let Some(url) = &cli.rates_url {
            self.rates_url = Some(url.clone());
        }
    }
}

/// CLI arguments structure.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path.
    pub config_file: Option<PathBuf>,
    /// Host address override.
    pub host: Option<String>,
    /// Port override.
    pub port: Option<u16>,
    /// Log level override.
    pub log_level: Option<String>,
    /// Rates source URL override.
    pub rates_url: Option<String>,
}

/// Build configuration from all sources.
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<ServerConfig, ConfigError> {
    let mut config = if let Some(config_path) = &cli.config_file {
        ServerConfig::from_file(config_path)?
    } else {
        ServerConfig::default()
    };

    config.apply_env()?;
    config.merge_with_cli(cli);
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.rates_url.is_none());
        assert_eq!(config.refresh_interval_secs, 6 * 60 * 60);
        assert_eq!(config.fetch_timeout_secs, 20);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);

        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_validate_port() {
        let mut config = ServerConfig::default();
        config.port = 0;
        assert!(config.validate().is_err());

        config.port = 8080;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_fetch_timeout() {
        let mut config = ServerConfig::default();
        config.fetch_timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFetchTimeout)
        ));
    }

    #[test]
    fn test_cli_args_merge() {
        let mut config = ServerConfig::default();
        let cli = CliArgs {
            host: Some("192.168.1.1".to_string()),
            port: Some(9000),
            log_level: Some("debug".to_string()),
            rates_url: Some("https://example.com/rates.csv".to_string()),
            config_file: None,
        };

        config.merge_with_cli(&cli);

        assert_eq!(config.host, "192.168.1.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(
            config.rates_url.as_deref(),
            Some("https://example.com/rates.csv")
        );
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
            host = "127.0.0.1"
            port = 3000
            log_level = "debug"
            rates_url = "https://example.com/key_rate.csv"
            refresh_interval_secs = 600
            fetch_timeout_secs = 30
        "#;

        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(
            config.rates_url.as_deref(),
            Some("https://example.com/key_rate.csv")
        );
        assert_eq!(config.refresh_interval_secs, 600);
        assert_eq!(config.fetch_timeout_secs, 30);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
            port = 9000
        "#;

        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert!(config.rates_url.is_none());
        assert_eq!(config.refresh_interval_secs, 6 * 60 * 60);
    }

    #[test]
    fn test_build_config_with_defaults() {
        // Clear any environment variables that might interfere
        std::env::remove_var("CALC395_HOST");
        std::env::remove_var("CALC395_PORT");
        std::env::remove_var("CALC395_LOG_LEVEL");
        std::env::remove_var("CALC395_RATES_URL");
        std::env::remove_var("CALC395_REFRESH_SECS");
        std::env::remove_var("CALC395_FETCH_TIMEOUT_SECS");

        let cli = CliArgs::default();
        let config = build_config(&cli).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(config.rates_url.is_none());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidPort(0);
        assert!(err.to_string().contains("Invalid port"));

        let err = ConfigError::InvalidLogLevel("bad".to_string());
        assert!(err.to_string().contains("Invalid log level"));
    }
}
