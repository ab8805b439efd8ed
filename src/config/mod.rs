//! Configuration management for the config center
//!
//! Configuration is read from a YAML file or from the environment, then
//! validated section by section before any store is touched.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{ConfigCenterError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Environment variable overriding the database URL
pub const ENV_DATABASE_URL: &str = "CONFIG_CENTER_DATABASE_URL";
/// Environment variable overriding the Redis URL
pub const ENV_REDIS_URL: &str = "CONFIG_CENTER_REDIS_URL";
/// Environment variable overriding the sync interval in seconds
pub const ENV_SYNC_INTERVAL: &str = "CONFIG_CENTER_SYNC_INTERVAL";

/// Main configuration struct for the config center
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigCenterError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ConfigCenterError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self::default().with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CONFIG_CENTER_*` environment variables over this configuration
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var(ENV_DATABASE_URL) {
            self.storage.database.url = url;
        }
        if let Ok(url) = std::env::var(ENV_REDIS_URL) {
            self.storage.redis.url = url;
        }
        if let Ok(raw) = std::env::var(ENV_SYNC_INTERVAL) {
            self.cache.sync_interval = raw.trim().parse().map_err(|_| {
                ConfigCenterError::Config(format!("{} must be a number of seconds, got '{}'", ENV_SYNC_INTERVAL, raw))
            })?;
        }
        Ok(self)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.storage
            .validate()
            .map_err(|e| ConfigCenterError::Config(format!("Storage config error: {}", e)))?;

        self.cache
            .validate()
            .map_err(|e| ConfigCenterError::Config(format!("Cache config error: {}", e)))?;

        self.rate_limit
            .validate()
            .map_err(|e| ConfigCenterError::Config(format!("Rate limit config error: {}", e)))?;

        self.retry
            .validate()
            .map_err(|e| ConfigCenterError::Config(format!("Retry config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.storage = self.storage.merge(other.storage);
        self.cache = other.cache;
        self.rate_limit = other.rate_limit;
        self.retry = other.retry;
        self.logging = other.logging;
        self
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigCenterError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
