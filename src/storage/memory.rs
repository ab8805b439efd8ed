//! In-process fast store
//!
//! Keys expire against the injected [`Clock`], so a test can advance a
//! [`ManualClock`](crate::utils::ManualClock) past a window and observe the
//! counter vanish without sleeping.

use super::fast_store::{FastStore, FastStoreStats};
use crate::utils::Clock;
use crate::utils::error::{ConfigCenterError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use regex::Regex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Expired entries are swept at most this often, in seconds
const SWEEP_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    /// Unix second at which the entry stops existing
    expires_at: Option<u64>,
}

impl Entry {
    fn is_live(&self, now: u64) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// DashMap-backed [`FastStore`]
#[derive(Debug)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
    last_sweep: AtomicU64,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let now = clock.now_unix();
        Self {
            entries: DashMap::new(),
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            last_sweep: AtomicU64::new(now),
        }
    }

    /// Live keys currently held
    pub fn len(&self) -> usize {
        let now = self.clock.now_unix();
        self.entries.iter().filter(|e| e.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remaining lifetime of a key in seconds, `None` if absent or persistent
    pub fn ttl(&self, key: &str) -> Option<u64> {
        let now = self.clock.now_unix();
        self.entries
            .get(key)
            .filter(|e| e.is_live(now))
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_sub(now))
    }

    /// Drop every expired entry, at most once per sweep interval
    ///
    /// Past-window counter keys are never read again, so reads alone do not
    /// evict them. Must not be called while holding a reference into
    /// `entries`.
    fn sweep_expired(&self, now: u64) {
        let last = self.last_sweep.load(Ordering::Relaxed);
        if now < last.saturating_add(SWEEP_INTERVAL_SECS) {
            return;
        }
        if self
            .last_sweep
            .compare_exchange(last, now, Ordering::AcqRel, Ordering::Relaxed)
            .is_err()
        {
            return;
        }
        let before = self.entries.len();
        self.entries.retain(|_, e| e.is_live(now));
        let swept = before.saturating_sub(self.entries.len());
        if swept > 0 {
            debug!("Memory store swept {} expired keys", swept);
        }
    }

    fn live_value(&self, key: &str) -> Option<String> {
        let now = self.clock.now_unix();
        let value = self.entries.get(key).and_then(|e| e.is_live(now).then(|| e.value.clone()));
        if value.is_none() {
            self.entries.remove_if(key, |_, e| !e.is_live(now));
        }
        value
    }

    fn add(&self, key: &str, delta: i64, expire_at: Option<u64>) -> Result<i64> {
        let now = self.clock.now_unix();
        self.sweep_expired(now);
        let mut entry = self.entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: "0".to_string(),
            expires_at: None,
        });
        if !entry.is_live(now) {
            entry.value = "0".to_string();
            entry.expires_at = None;
        }
        let current: i64 = entry
            .value
            .parse()
            .map_err(|_| ConfigCenterError::internal(format!("value at '{}' is not an integer", key)))?;
        let next = current
            .checked_add(delta)
            .ok_or_else(|| ConfigCenterError::internal(format!("increment would overflow '{}'", key)))?;
        entry.value = next.to_string();
        if expire_at.is_some() {
            entry.expires_at = expire_at;
        }
        Ok(next)
    }
}

/// Translate a Redis glob into an anchored regex
fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push('^');
    for c in pattern.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');
    Regex::new(&expr).map_err(|e| ConfigCenterError::internal(format!("bad scan pattern '{}': {}", pattern, e)))
}

#[async_trait]
impl FastStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.live_value(key);
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<()> {
        let now = self.clock.now_unix();
        self.sweep_expired(now);
        let expires_at = ttl.map(|t| now.saturating_add(t));
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64> {
        let now = self.clock.now_unix();
        let removed = keys
            .iter()
            .filter_map(|k| self.entries.remove(k))
            .filter(|(_, e)| e.is_live(now))
            .count();
        Ok(removed as u64)
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.get(key).await?);
        }
        Ok(values)
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        self.add(key, delta, None)
    }

    async fn increment_until(&self, key: &str, delta: i64, expire_at: u64) -> Result<i64> {
        self.add(key, delta, Some(expire_at))
    }

    async fn reset_until(&self, key: &str, expire_at: u64) -> Result<()> {
        self.sweep_expired(self.clock.now_unix());
        self.entries.insert(
            key.to_string(),
            Entry {
                value: "0".to_string(),
                expires_at: Some(expire_at),
            },
        );
        Ok(())
    }

    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>> {
        let matcher = glob_to_regex(pattern)?;
        let now = self.clock.now_unix();
        let keys: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.is_live(now) && matcher.is_match(e.key()))
            .map(|e| e.key().clone())
            .collect();
        debug!("Memory scan '{}' matched {} keys", pattern, keys.len());
        Ok(keys)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    async fn stats(&self) -> Result<FastStoreStats> {
        Ok(FastStoreStats {
            backend: self.backend().to_string(),
            connected: true,
            keyspace_hits: self.hits.load(Ordering::Relaxed),
            keyspace_misses: self.misses.load(Ordering::Relaxed),
            hit_rate: 0.0,
            used_memory: None,
            connected_clients: None,
            total_keys: Some(self.len() as u64),
        }
        .with_hit_rate())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
