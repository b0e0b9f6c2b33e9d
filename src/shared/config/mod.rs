//! Application configuration module
//!
//! Configuration is assembled in layers, later layers winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (path taken from `SOCIALHUB_CONFIG`)
//! 3. environment variables
//!
//! ```toml
//! port = 4000
//! cors_origin = "https://social.example.com"
//! pending_ttl_ms = 2000
//! ```

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the optional TOML config file
pub const CONFIG_FILE_ENV: &str = "SOCIALHUB_CONFIG";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_OUTBOUND_BUFFER: usize = 64;
const DEFAULT_PENDING_CAPACITY: usize = 32;
const DEFAULT_PENDING_MAX_USERS: usize = 1024;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Interface to bind
    pub host: String,
    /// Listening port, 0 picks an ephemeral port
    pub port: u16,
    /// The single origin allowed by CORS
    pub cors_origin: String,
    /// Whether CORS responses allow credentials
    pub cors_credentials: bool,
    /// Postgres connection string, required by the server binary
    pub database_url: Option<String>,
    /// Directory served as static fallback
    pub public_dir: PathBuf,
    /// Per-connection outbound queue capacity
    pub outbound_buffer: usize,
    /// How long notifications for offline users are held. Zero disables holding.
    pub pending_ttl: Duration,
    /// Maximum held notifications per user, at most `outbound_buffer`
    pub pending_capacity: usize,
    /// Maximum users with held notifications at any one time
    pub pending_max_users: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            cors_credentials: true,
            database_url: None,
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            pending_ttl: Duration::ZERO,
            pending_capacity: DEFAULT_PENDING_CAPACITY,
            pending_max_users: DEFAULT_PENDING_MAX_USERS,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load from the config file named by `SOCIALHUB_CONFIG` (if any) and
    /// the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            builder = builder.apply_toml(&text)?;
        }
        builder.apply_env(|key| std::env::var(key).ok())?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let origin = self.cors_origin.trim();
        if origin.is_empty() {
            return Err(ConfigError::MissingValue("CORS_ORIGIN"));
        }
        if !(origin.starts_with("http://") || origin.starts_with("https://"))
            || origin.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::InvalidUrl(self.cors_origin.clone()));
        }
        if self.outbound_buffer == 0 {
            return Err(ConfigError::invalid("OUTBOUND_BUFFER", "0"));
        }
        if self.pending_capacity == 0 {
            return Err(ConfigError::invalid("PENDING_NOTIFY_CAPACITY", "0"));
        }
        // A join flushes the whole held queue into a fresh outbound queue
        if self.pending_enabled() && self.pending_capacity > self.outbound_buffer {
            return Err(ConfigError::invalid(
                "PENDING_NOTIFY_CAPACITY",
                format!(
                    "{} (exceeds OUTBOUND_BUFFER {})",
                    self.pending_capacity, self.outbound_buffer
                ),
            ));
        }
        if self.pending_max_users == 0 {
            return Err(ConfigError::invalid("PENDING_NOTIFY_MAX_USERS", "0"));
        }
        if let Some(url) = &self.database_url {
            if url.trim().is_empty() {
                return Err(ConfigError::MissingValue("DATABASE_URL"));
            }
        }
        Ok(())
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn pending_enabled(&self) -> bool {
        !self.pending_ttl.is_zero()
    }
}

/// Shape of the optional TOML file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    cors_origin: Option<String>,
    cors_credentials: Option<bool>,
    database_url: Option<String>,
    public_dir: Option<PathBuf>,
    outbound_buffer: Option<usize>,
    pending_ttl_ms: Option<u64>,
    pending_capacity: Option<usize>,
    pending_max_users: Option<usize>,
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.config.cors_origin = origin.into();
        self
    }

    pub fn cors_credentials(mut self, enabled: bool) -> Self {
        self.config.cors_credentials = enabled;
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn public_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.public_dir = dir.into();
        self
    }

    pub fn outbound_buffer(mut self, capacity: usize) -> Self {
        self.config.outbound_buffer = capacity;
        self
    }

    pub fn pending_ttl(mut self, ttl: Duration) -> Self {
        self.config.pending_ttl = ttl;
        self
    }

    pub fn pending_capacity(mut self, capacity: usize) -> Self {
        self.config.pending_capacity = capacity;
        self
    }

    pub fn pending_max_users(mut self, max_users: usize) -> Self {
        self.config.pending_max_users = max_users;
        self
    }

    /// Overlay values from a TOML document
    pub fn apply_toml(mut self, text: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(text)?;
        if let Some(host) = file.host {
            self.config.host = host;
        }
        if let Some(port) = file.port {
            self.config.port = port;
        }
        if let Some(origin) = file.cors_origin {
            self.config.cors_origin = origin;
        }
        if let Some(credentials) = file.cors_credentials {
            self.config.cors_credentials = credentials;
        }
        if let Some(url) = file.database_url {
            self.config.database_url = Some(url);
        }
        if let Some(dir) = file.public_dir {
            self.config.public_dir = dir;
        }
        if let Some(capacity) = file.outbound_buffer {
            self.config.outbound_buffer = capacity;
        }
        if let Some(ms) = file.pending_ttl_ms {
            self.config.pending_ttl = Duration::from_millis(ms);
        }
        if let Some(capacity) = file.pending_capacity {
            self.config.pending_capacity = capacity;
        }
        if let Some(max_users) = file.pending_max_users {
            self.config.pending_max_users = max_users;
        }
        Ok(self)
    }

    /// Overlay values from environment-style lookups
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.config.port = parse_value("PORT", &port)?;
        }
        if let Some(origin) = lookup("CORS_ORIGIN") {
            self.config.cors_origin = origin;
        }
        if let Some(credentials) = lookup("CORS_CREDENTIALS") {
            self.config.cors_credentials = parse_bool("CORS_CREDENTIALS", &credentials)?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.config.database_url = Some(url);
        }
        if let Some(dir) = lookup("PUBLIC_DIR") {
            self.config.public_dir = PathBuf::from(dir);
        }
        if let Some(capacity) = lookup("OUTBOUND_BUFFER") {
            self.config.outbound_buffer = parse_value("OUTBOUND_BUFFER", &capacity)?;
        }
        if let Some(ms) = lookup("PENDING_NOTIFY_TTL_MS") {
            let ms: u64 = parse_value("PENDING_NOTIFY_TTL_MS", &ms)?;
            self.config.pending_ttl = Duration::from_millis(ms);
        }
        if let Some(capacity) = lookup("PENDING_NOTIFY_CAPACITY") {
            self.config.pending_capacity = parse_value("PENDING_NOTIFY_CAPACITY", &capacity)?;
        }
        if let Some(max_users) = lookup("PENDING_NOTIFY_MAX_USERS") {
            self.config.pending_max_users = parse_value("PENDING_NOTIFY_MAX_USERS", &max_users)?;
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::invalid(key, raw))
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, raw)),
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    fn invalid(key: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
        }
    }
}
