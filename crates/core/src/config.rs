// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration for the store connection, mutex timing and down-marker
//!
//! Loaded from TOML; every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How values are encoded on their way into the store
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Serializer {
    /// JSON documents; any value round-trips
    #[default]
    Json,
    /// Plain text; only scalars are accepted, reads come back as strings
    Raw,
}

/// Where to reach the store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

/// Client-side options applied after connecting
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientOptions {
    pub serializer: Serializer,
    /// Prepended to every key the client touches
    pub key_prefix: String,
}

/// Top-level configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IpcConfig {
    pub store: StoreConfig,
    pub mutex: MutexConfig,
    pub down: DownConfig,
    pub logging: LoggingConfig,
}

impl IpcConfig {
    /// Read, parse and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML content
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: IpcConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()?;
        self.mutex.validate()?;
        self.down.validate()
    }
}

/// Store connection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    pub password: Option<String>,
    /// Database index selected after connecting
    pub namespace: u32,
    pub key_prefix: String,
    pub serializer: Serializer,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            connect_timeout: Duration::from_secs(2),
            password: None,
            namespace: 0,
            key_prefix: "kvipc:".to_string(),
            serializer: Serializer::Json,
        }
    }
}

impl StoreConfig {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            host: self.host.clone(),
            port: self.port,
            timeout: self.connect_timeout,
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            serializer: self.serializer,
            key_prefix: self.key_prefix.clone(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("store.host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("store.port must not be 0".into()));
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "store.connect_timeout must not be 0".into(),
            ));
        }
        if self.key_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(
                "store.key_prefix must not contain whitespace".into(),
            ));
        }
        Ok(())
    }
}

/// Mutex timing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MutexConfig {
    /// TTL of the mutex key, and the wait budget of a blocked caller
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Poll interval between acquisition attempts
    #[serde(with = "humantime_serde")]
    pub block_wait: Duration,
}

impl Default for MutexConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            block_wait: Duration::from_millis(20),
        }
    }
}

impl MutexConfig {
    pub fn new(timeout: Duration, block_wait: Duration) -> Self {
        Self {
            timeout,
            block_wait,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_block_wait(mut self, block_wait: Duration) -> Self {
        self.block_wait = block_wait;
        self
    }

    /// Failed attempts tolerated before the store is declared down
    pub fn max_wait_cycles(&self) -> u64 {
        if self.block_wait.is_zero() {
            return 1;
        }
        let ratio = self.timeout.as_secs_f64() / self.block_wait.as_secs_f64();
        ratio.round() as u64 + 1
    }

    /// Attempts between two progress logs while waiting
    pub fn log_wait_cycles(&self) -> u64 {
        ((self.max_wait_cycles() as f64 / 5.0).round() as u64).max(1)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.block_wait.is_zero() {
            return Err(ConfigError::Invalid("mutex.block_wait must not be 0".into()));
        }
        if self.timeout < self.block_wait {
            return Err(ConfigError::Invalid(format!(
                "mutex.timeout ({:?}) must be at least mutex.block_wait ({:?})",
                self.timeout, self.block_wait
            )));
        }
        Ok(())
    }
}

/// How long the store stays marked down, and where that is remembered
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DownConfig {
    #[serde(with = "humantime_serde")]
    pub expiration: Duration,
    pub marker_path: PathBuf,
}

impl Default for DownConfig {
    fn default() -> Self {
        Self {
            expiration: Duration::from_secs(60),
            marker_path: std::env::temp_dir().join("kvipc-store-down"),
        }
    }
}

impl DownConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.expiration < Duration::from_secs(1) {
            return Err(ConfigError::Invalid(
                "down.expiration must be at least 1s".into(),
            ));
        }
        if self.marker_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "down.marker_path must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Log output
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log file; stderr when unset
    pub file: Option<PathBuf>,
    /// Filter directive used when `RUST_LOG` is not set
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
