//! Storage layer for the config center
//!
//! Two stores sit behind traits: the relational [`ConfigStore`] (system of
//! record) and the [`FastStore`] (cache and counters).

/// Relational store abstraction
pub mod config_store;
/// Database storage module
pub mod database;
/// Fast store abstraction
pub mod fast_store;
/// In-process fast store
pub mod memory;
/// Redis cache module
pub mod redis;

pub use config_store::ConfigStore;
pub use fast_store::{FastStore, FastStoreStats};
pub use memory::MemoryStore;

use crate::config::StorageConfig;
use crate::utils::Clock;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Both store handles, created once at start-up
#[derive(Clone)]
pub struct StorageLayer {
    /// Relational store
    pub config_store: Arc<dyn ConfigStore>,
    /// Fast store
    pub fast_store: Arc<dyn FastStore>,
}

impl StorageLayer {
    /// Connect both stores
    ///
    /// With Redis disabled the in-process [`MemoryStore`] is used. An
    /// unreachable Redis puts the pool in no-op mode instead of failing.
    pub async fn new(config: &StorageConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        info!("Initializing storage layer");

        debug!("Connecting to database");
        let database = database::Database::new(&config.database).await?;

        let fast_store: Arc<dyn FastStore> = if config.redis.enabled {
            debug!("Connecting to Redis");
            Arc::new(redis::RedisPool::connect_or_noop(&config.redis).await?)
        } else {
            debug!("Redis disabled, using in-process memory store");
            Arc::new(MemoryStore::new(clock))
        };

        info!("Storage layer initialized (fast store: {})", fast_store.backend());
        Ok(Self {
            config_store: Arc::new(database),
            fast_store,
        })
    }

    /// Assemble from existing handles
    pub fn from_parts(config_store: Arc<dyn ConfigStore>, fast_store: Arc<dyn FastStore>) -> Self {
        Self {
            config_store,
            fast_store,
        }
    }

    /// Health check for both stores
    pub async fn health_check(&self) -> StorageHealthStatus {
        let (database, fast) = tokio::join!(self.config_store.health_check(), self.fast_store.health_check());

        let database = match database {
            Ok(()) => true,
            Err(e) => {
                warn!("Database health check failed: {}", e);
                false
            }
        };
        let fast_store = match fast {
            Ok(()) => true,
            Err(e) => {
                warn!("Fast store health check failed: {}", e);
                false
            }
        };

        StorageHealthStatus {
            database,
            fast_store,
            fast_store_backend: self.fast_store.backend().to_string(),
            // A fast store outage is a degraded mode, not an outage
            overall: database,
        }
    }
}

/// Storage health status
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StorageHealthStatus {
    pub database: bool,
    pub fast_store: bool,
    pub fast_store_backend: String,
    /// True while the relational store answers
    pub overall: bool,
}
