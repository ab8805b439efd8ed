//! Fast store abstraction
//!
//! The fast store is both the read-through cache for configuration records
//! and the backend for rate-limit counters. Redis implements it in
//! production; [`MemoryStore`](super::MemoryStore) implements it in process.

use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Key-value operations the config center needs from its fast store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FastStore: Send + Sync {
    /// Get a value, `None` when the key is absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value with an optional TTL in seconds
    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<()>;

    /// Delete a key; deleting an absent key is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Delete several keys, returning how many existed
    async fn delete_many(&self, keys: &[String]) -> Result<u64>;

    /// Get several values in one round trip, in request order
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>>;

    /// Atomically add `delta` and return the new value
    async fn increment(&self, key: &str, delta: i64) -> Result<i64>;

    /// Atomically add `delta` and make the key expire at `expire_at` (unix seconds)
    ///
    /// Setting the same expiry again is harmless, so no read is needed first.
    async fn increment_until(&self, key: &str, delta: i64, expire_at: u64) -> Result<i64>;

    /// Set the key to `0` and make it expire at `expire_at`
    async fn reset_until(&self, key: &str, expire_at: u64) -> Result<()>;

    /// Keys matching a glob pattern (`*` and `?`), collected with cursor scans
    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>>;

    async fn health_check(&self) -> Result<()>;

    async fn stats(&self) -> Result<FastStoreStats>;

    /// Short backend name for logs
    fn backend(&self) -> &'static str;
}

/// Fast store statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FastStoreStats {
    pub backend: String,
    pub connected: bool,
    pub keyspace_hits: u64,
    pub keyspace_misses: u64,
    /// Hit rate in percent, 0 when there has been no traffic
    pub hit_rate: f64,
    #[serde(default)]
    pub used_memory: Option<String>,
    #[serde(default)]
    pub connected_clients: Option<u64>,
    #[serde(default)]
    pub total_keys: Option<u64>,
}

impl FastStoreStats {
    /// Fill in `hit_rate` from the hit and miss counters
    pub fn with_hit_rate(mut self) -> Self {
        let total = self.keyspace_hits + self.keyspace_misses;
        self.hit_rate = if total == 0 {
            0.0
        } else {
            self.keyspace_hits as f64 / total as f64 * 100.0
        };
        self
    }
}
