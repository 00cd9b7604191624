//! Application configuration.
//!
//! Settings come from an optional TOML file followed by `PAPERTRAIL_*`
//! environment overrides. The file is named by `PAPERTRAIL_CONFIG`, or
//! defaults to `papertrail.toml` in the working directory; a missing file
//! leaves every section at its default.

use crate::lock::LockSettings;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "PAPERTRAIL_CONFIG";

/// Configuration file read when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "papertrail.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("read config {path}: {source}")]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`AppConfig`].
    #[error("parse config {path}: {source}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying TOML failure.
        source: toml::de::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid {key} value '{value}': {reason}")]
    InvalidEnv {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A setting is out of range.
    #[error("invalid setting {setting}: {reason}")]
    Invalid {
        /// Dotted setting path.
        setting: &'static str,
        /// Why the setting was rejected.
        reason: &'static str,
    },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// `PostgreSQL` connection.
    pub database: DatabaseConfig,
    /// Per-message locking.
    pub locks: LocksConfig,
    /// Record cache.
    pub cache: CacheConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_owned(),
        }
    }
}

/// `PostgreSQL` settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,
    /// Connections shared by the repositories.
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/papertrail".to_owned(),
            pool_size: 10,
        }
    }
}

/// Lock coordination backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockBackend {
    /// `PostgreSQL` advisory locks, shared across processes.
    #[default]
    Postgres,
    /// In-process queue, for single-node runs.
    Local,
}

impl FromStr for LockBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            other => Err(format!("unknown lock backend '{other}'")),
        }
    }
}

/// Per-message locking settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocksConfig {
    /// Whether content operations run under a per-message lock.
    pub enabled: bool,
    /// Which lock manager to use.
    pub backend: LockBackend,
    /// Wait limit in milliseconds; absent means wait indefinitely.
    pub wait_timeout_ms: Option<u64>,
    /// Connections reserved for advisory lock sessions.
    pub pool_size: u32,
}

impl Default for LocksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: LockBackend::default(),
            wait_timeout_ms: None,
            pool_size: 16,
        }
    }
}

impl LocksConfig {
    /// Converts to adapter settings. A zero timeout means no limit.
    #[must_use]
    pub fn settings(&self) -> LockSettings {
        self.wait_timeout_ms
            .filter(|ms| *ms > 0)
            .map_or_else(LockSettings::unbounded, |ms| {
                LockSettings::with_wait_timeout(Duration::from_millis(ms))
            })
    }
}

/// Record cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether records are cached at all.
    pub enabled: bool,
    /// Entries kept per region.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 1024,
        }
    }
}

impl CacheConfig {
    /// Returns the per-region capacity when caching is enabled.
    #[must_use]
    pub fn region_capacity(&self) -> Option<NonZeroUsize> {
        self.enabled.then_some(self.capacity).and_then(NonZeroUsize::new)
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Plain,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
    /// Line format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,papertrail=debug".to_owned(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the file system and process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// when an override or setting is invalid.
    pub fn load() -> ConfigResult<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        let mut config = Self::from_file(&path)?.unwrap_or_default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, returning `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> ConfigResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Applies `PAPERTRAIL_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] for values that do not parse.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PAPERTRAIL_DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(bind) = lookup("PAPERTRAIL_BIND") {
            self.server.bind = bind;
        }
        if let Some(enabled) = parse_env(&lookup, "PAPERTRAIL_LOCKS_ENABLED", parse_bool)? {
            self.locks.enabled = enabled;
        }
        if let Some(backend) = parse_env(&lookup, "PAPERTRAIL_LOCK_BACKEND", LockBackend::from_str)? {
            self.locks.backend = backend;
        }
        if let Some(ms) = parse_env(&lookup, "PAPERTRAIL_LOCK_WAIT_TIMEOUT_MS", parse_number::<u64>)? {
            self.locks.wait_timeout_ms = (ms > 0).then_some(ms);
        }
        if let Some(capacity) =
            parse_env(&lookup, "PAPERTRAIL_CACHE_CAPACITY", parse_number::<usize>)?
        {
            self.cache.capacity = capacity;
        }
        if let Some(format) = parse_env(&lookup, "PAPERTRAIL_LOG_FORMAT", LogFormat::from_str)? {
            self.logging.format = format;
        }
        Ok(())
    }

    /// Rejects settings that cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending setting.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.pool_size == 0 {
            return Err(ConfigError::Invalid {
                setting: "database.pool_size",
                reason: "must be at least 1",
            });
        }
        if self.locks.enabled
            && self.locks.backend == LockBackend::Postgres
            && self.locks.pool_size == 0
        {
            return Err(ConfigError::Invalid {
                setting: "locks.pool_size",
                reason: "must be at least 1 for the postgres backend",
            });
        }
        if self.cache.enabled && self.cache.capacity == 0 {
            return Err(ConfigError::Invalid {
                setting: "cache.capacity",
                reason: "must be at least 1 when the cache is enabled",
            });
        }
        Ok(())
    }
}

fn parse_env<F, T, P>(lookup: &F, key: &'static str, parse: P) -> ConfigResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Result<T, String>,
{
    lookup(key)
        .map(|value| {
            parse(&value).map_err(|reason| ConfigError::InvalidEnv { key, value, reason })
        })
        .transpose()
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got '{other}'")),
    }
}

fn parse_number<T>(value: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|err| err.to_string())
}
