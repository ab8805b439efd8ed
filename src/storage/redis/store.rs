//! [`FastStore`] implementation backed by Redis

use super::pool::RedisPool;
use crate::storage::fast_store::{FastStore, FastStoreStats};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
impl FastStore for RedisPool {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        RedisPool::get(self, key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<()> {
        RedisPool::set(self, key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        RedisPool::delete(self, key).await
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64> {
        RedisPool::delete_many(self, keys).await
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        RedisPool::mget(self, keys).await
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        RedisPool::increment(self, key, delta).await
    }

    async fn increment_until(&self, key: &str, delta: i64, expire_at: u64) -> Result<i64> {
        RedisPool::increment_until(self, key, delta, expire_at).await
    }

    async fn reset_until(&self, key: &str, expire_at: u64) -> Result<()> {
        RedisPool::reset_until(self, key, expire_at).await
    }

    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>> {
        RedisPool::scan_keys(self, pattern).await
    }

    async fn health_check(&self) -> Result<()> {
        self.ping().await
    }

    async fn stats(&self) -> Result<FastStoreStats> {
        if self.noop_mode {
            return Ok(FastStoreStats {
                backend: "noop".to_string(),
                ..Default::default()
            });
        }
        let info = self.info().await?;
        Ok(parse_info(&info))
    }

    fn backend(&self) -> &'static str {
        if self.noop_mode { "noop" } else { "redis" }
    }
}

/// Pull the fields we report out of an `INFO` reply
pub(crate) fn parse_info(info: &str) -> FastStoreStats {
    let mut stats = FastStoreStats {
        backend: "redis".to_string(),
        connected: true,
        ..Default::default()
    };

    for line in info.lines() {
        let Some((field, value)) = line.trim().split_once(':') else {
            continue;
        };
        match field {
            "keyspace_hits" => stats.keyspace_hits = value.parse().unwrap_or(0),
            "keyspace_misses" => stats.keyspace_misses = value.parse().unwrap_or(0),
            "used_memory_human" => stats.used_memory = Some(value.to_string()),
            "connected_clients" => stats.connected_clients = value.parse().ok(),
            // db0:keys=12,expires=3,avg_ttl=0
            db if db.starts_with("db") => {
                let keys = value
                    .split(',')
                    .find_map(|kv| kv.strip_prefix("keys="))
                    .and_then(|n| n.parse::<u64>().ok())
                    .unwrap_or(0);
                stats.total_keys = Some(stats.total_keys.unwrap_or(0) + keys);
            }
            _ => {}
        }
    }

    stats.with_hit_rate()
}
