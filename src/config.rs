//! Configuration module for the mailing list registry.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

use crate::{MailError, Result};

/// Environment variable overriding the database path.
pub const ENV_DB_PATH: &str = "MAILINGLIST_DB";
/// Environment variable overriding the JSON API bind address.
pub const ENV_BIND_JSON: &str = "MAILINGLIST_BIND_JSON";
/// Environment variable overriding the gRPC API bind address.
pub const ENV_BIND_GRPC: &str = "MAILINGLIST_BIND_GRPC";
/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "MAILINGLIST_LOG_LEVEL";

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "list.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// JSON/HTTP API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonApiConfig {
    /// Address to bind, e.g. `0.0.0.0:8080` or `:8080`.
    #[serde(default = "default_json_bind")]
    pub bind: String,
}

fn default_json_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for JsonApiConfig {
    fn default() -> Self {
        Self {
            bind: default_json_bind(),
        }
    }
}

impl JsonApiConfig {
    /// Parse the configured bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        parse_bind(&self.bind)
    }
}

/// gRPC API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GrpcConfig {
    /// Address to bind, e.g. `0.0.0.0:8081` or `:8081`.
    #[serde(default = "default_grpc_bind")]
    pub bind: String,
}

fn default_grpc_bind() -> String {
    "0.0.0.0:8081".to_string()
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            bind: default_grpc_bind(),
        }
    }
}

impl GrpcConfig {
    /// Parse the configured bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        parse_bind(&self.bind)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file, written in addition to stdout.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// JSON API configuration.
    #[serde(default)]
    pub json: JsonApiConfig,
    /// gRPC API configuration.
    #[serde(default)]
    pub grpc: GrpcConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(MailError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file, or the defaults when the file is missing.
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(MailError::Io(e)),
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| MailError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `MAILINGLIST_DB`: database file path
    /// - `MAILINGLIST_BIND_JSON`: JSON API bind address
    /// - `MAILINGLIST_BIND_GRPC`: gRPC API bind address
    /// - `MAILINGLIST_LOG_LEVEL`: log level
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup. Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(path) = get(ENV_DB_PATH) {
            self.database.path = path;
        }
        if let Some(bind) = get(ENV_BIND_JSON) {
            self.json.bind = bind;
        }
        if let Some(bind) = get(ENV_BIND_GRPC) {
            self.grpc.bind = bind;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - either bind address does not parse
    /// - both APIs are configured on the same address
    pub fn validate(&self) -> Result<()> {
        let json = self.json.socket_addr()?;
        let grpc = self.grpc.socket_addr()?;
        if json == grpc {
            return Err(MailError::Config(format!(
                "JSON and gRPC APIs cannot share the bind address {json}"
            )));
        }
        Ok(())
    }
}

/// Parse a bind address, accepting the `:port` shorthand for all interfaces.
pub fn parse_bind(bind: &str) -> Result<SocketAddr> {
    let bind = bind.trim();
    let normalized = if bind.starts_with(':') {
        format!("0.0.0.0{bind}")
    } else {
        bind.to_string()
    };

    normalized
        .parse()
        .map_err(|e| MailError::Config(format!("invalid bind address '{bind}': {e}")))
}
