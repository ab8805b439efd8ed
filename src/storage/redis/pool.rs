//! Redis connection pool and core connection management

use crate::config::RedisConfig;
use crate::utils::error::{ConfigCenterError, Result};
use redis::Client;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Redis connection pool (supports no-op mode when Redis is unavailable)
///
/// In no-op mode reads miss, writes are skipped and increments report the
/// delta, so the relational store keeps serving every read.
#[derive(Clone)]
pub struct RedisPool {
    /// Self-reconnecting multiplexed connection (None in no-op mode)
    pub(crate) connection: Option<ConnectionManager>,
    pub(crate) config: RedisConfig,
    pub(crate) noop_mode: bool,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool")
            .field("url", &Self::sanitize_url(&self.config.url))
            .field("noop_mode", &self.noop_mode)
            .finish()
    }
}

/// Redis connection wrapper
pub struct RedisConnection {
    pub(crate) conn: Option<ConnectionManager>,
}

impl RedisPool {
    /// Connect to Redis
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        info!("Creating Redis connection pool");
        debug!("Redis URL: {}", Self::sanitize_url(&config.url));

        let client = Client::open(config.url.as_str())
            .map_err(|e| ConfigCenterError::config(format!("Invalid Redis URL: {}", e)))?;

        // A dropped connection is re-established on the next command, so the
        // cache recovers once Redis is back without restarting the process
        let timeout = Duration::from_secs(config.connection_timeout);
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(timeout)
            .set_number_of_retries(1);
        let connection = tokio::time::timeout(timeout, ConnectionManager::new_with_config(client, manager_config))
            .await
            .map_err(|_| {
                ConfigCenterError::FastStoreUnavailable(format!(
                    "Timed out connecting to Redis after {}s",
                    config.connection_timeout
                ))
            })??;

        info!("Redis connection pool created successfully");
        Ok(Self {
            connection: Some(connection),
            config: config.clone(),
            noop_mode: false,
        })
    }

    /// Connect, falling back to no-op mode when Redis cannot be reached
    pub async fn connect_or_noop(config: &RedisConfig) -> Result<Self> {
        match Self::new(config).await {
            Ok(pool) => Ok(pool),
            Err(e) if e.is_fast_store_unavailable() => {
                warn!("Redis unavailable at start-up, continuing without cache: {}", e);
                Ok(Self::create_noop())
            }
            Err(e) => Err(e),
        }
    }

    /// Create a no-op Redis pool (for when Redis is unavailable)
    pub fn create_noop() -> Self {
        info!("Creating no-op Redis pool (Redis unavailable)");
        Self {
            connection: None,
            config: RedisConfig {
                url: String::new(),
                enabled: false,
                connection_timeout: 0,
            },
            noop_mode: true,
        }
    }

    /// Check if this is a no-op pool
    pub fn is_noop(&self) -> bool {
        self.noop_mode
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> RedisConnection {
        RedisConnection {
            conn: self.connection.clone(),
        }
    }

    /// Health check
    pub async fn ping(&self) -> Result<()> {
        if self.noop_mode {
            debug!("Redis health check skipped (no-op mode)");
            return Ok(());
        }

        debug!("Performing Redis health check");
        let mut conn = self.get_connection();
        if let Some(ref mut c) = conn.conn {
            let _: String = redis::cmd("PING").query_async(c).await?;
        }

        debug!("Redis health check passed");
        Ok(())
    }

    /// Sanitize Redis URL for logging (hide password)
    pub(crate) fn sanitize_url(url: &str) -> String {
        if let Ok(parsed) = url::Url::parse(url) {
            let mut sanitized = parsed.clone();
            if sanitized.password().is_some() {
                let _ = sanitized.set_password(Some("***"));
            }
            sanitized.to_string()
        } else {
            "invalid_url".to_string()
        }
    }
}
