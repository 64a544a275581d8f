//! Configuration management for session-ledger.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::{ServerConfig, SessionCookie, DEFAULT_COOKIE_NAME};
use crate::cli::{Args, DEFAULT_HOST};
use crate::session::DEFAULT_SESSION_MAX_AGE;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerSection,
    /// Storage configuration.
    pub storage: StorageSection,
    /// Session cookie configuration.
    pub session: SessionSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Enable graceful shutdown.
    pub graceful_shutdown: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: 3000,
            graceful_shutdown: true,
        }
    }
}

/// Storage configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// SQLite database path; `:memory:` keeps nothing across restarts.
    pub database: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            database: "ledger.db".to_string(),
        }
    }
}

/// Session cookie configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Name of the cookie carrying the session token.
    pub cookie_name: String,
    /// Lifetime of a newly minted token, in seconds.
    pub max_age_secs: u64,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            max_age_secs: DEFAULT_SESSION_MAX_AGE.as_secs(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = var("SESSION_LEDGER_HOST") {
            self.server.host = host;
        }

        if let Some(port) = var("SESSION_LEDGER_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        if let Some(database) = var("SESSION_LEDGER_DATABASE").filter(|d| !d.is_empty()) {
            self.storage.database = database;
        }

        if let Some(level) = var("SESSION_LEDGER_LOG_LEVEL").or_else(|| var("RUST_LOG")) {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = args.host {
            self.server.host = host.to_string();
        }

        if let Some(port) = args.port {
            self.server.port = port;
        }

        if let Some(ref database) = args.database {
            self.storage.database = database.clone();
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Convert to ServerConfig for the API server.
    pub fn to_server_config(&self) -> Result<ServerConfig, ConfigError> {
        let host: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.server.host.clone()))?;

        let server_config = ServerConfig::new(host.to_string(), self.server.port);
        if self.server.graceful_shutdown {
            Ok(server_config)
        } else {
            Ok(server_config.without_graceful_shutdown())
        }
    }

    /// Convert to the cookie settings used by the session extractors.
    pub fn to_session_cookie(&self) -> Result<SessionCookie, ConfigError> {
        let name = &self.session.cookie_name;
        let valid = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));
        if !valid {
            return Err(ConfigError::InvalidCookieName(name.clone()));
        }

        Ok(SessionCookie::new(
            name.clone(),
            Duration::from_secs(self.session.max_age_secs),
        ))
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// Invalid host address.
    InvalidHost(String),
    /// Cookie name with characters not allowed in a cookie token.
    InvalidCookieName(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::InvalidHost(host) => write!(f, "invalid host address: {}", host),
            Self::InvalidCookieName(name) => write!(f, "invalid cookie name: '{}'", name),
        }
    }
}

impl std::error::Error for ConfigError {}
