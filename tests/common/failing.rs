//! A fast store that cannot be reached

use async_trait::async_trait;
use config_center::ConfigCenterError;
use config_center::Result;
use config_center::storage::{FastStore, FastStoreStats};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fails every call the way an unreachable Redis does
#[derive(Debug, Default)]
pub struct FailingStore {
    calls: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls attempted so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn refuse<T>(&self) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ConfigCenterError::fast_store_unavailable("connection refused"))
    }
}

#[async_trait]
impl FastStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        self.refuse()
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Option<u64>) -> Result<()> {
        self.refuse()
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        self.refuse()
    }

    async fn delete_many(&self, _keys: &[String]) -> Result<u64> {
        self.refuse()
    }

    async fn mget(&self, _keys: &[String]) -> Result<Vec<Option<String>>> {
        self.refuse()
    }

    async fn increment(&self, _key: &str, _delta: i64) -> Result<i64> {
        self.refuse()
    }

    async fn increment_until(&self, _key: &str, _delta: i64, _expire_at: u64) -> Result<i64> {
        self.refuse()
    }

    async fn reset_until(&self, _key: &str, _expire_at: u64) -> Result<()> {
        self.refuse()
    }

    async fn scan_keys(&self, _pattern: &str) -> Result<Vec<String>> {
        self.refuse()
    }

    async fn health_check(&self) -> Result<()> {
        self.refuse()
    }

    async fn stats(&self) -> Result<FastStoreStats> {
        self.refuse()
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}
