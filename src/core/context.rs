//! Process-wide handles
//!
//! One [`AppContext`] is built at start-up and passed to every operation.
//! Cloning is cheap: every handle is shared.

use crate::config::{CacheConfig, Config, RateLimitConfig};
use crate::core::cache::BackgroundTasks;
use crate::storage::{ConfigStore, FastStore, StorageLayer};
use crate::utils::error::RetryPolicy;
use crate::utils::{Clock, SystemClock};
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    /// Relational system of record
    pub store: Arc<dyn ConfigStore>,
    /// Cache and counter backend
    pub fast: Arc<dyn FastStore>,
    pub clock: Arc<dyn Clock>,
    /// Detached cache population
    pub tasks: BackgroundTasks,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
    /// Applied to relational reads and idempotent writes
    pub retry: RetryPolicy,
}

impl AppContext {
    pub fn new(storage: StorageLayer, clock: Arc<dyn Clock>, config: &Config) -> Self {
        Self {
            store: storage.config_store,
            fast: storage.fast_store,
            clock,
            tasks: BackgroundTasks::new(),
            cache: config.cache.clone(),
            rate_limit: config.rate_limit.clone(),
            retry: RetryPolicy::new(config.retry.clone()),
        }
    }

    /// Context with default settings and the system clock
    pub fn with_stores(store: Arc<dyn ConfigStore>, fast: Arc<dyn FastStore>) -> Self {
        Self::new(
            StorageLayer::from_parts(store, fast),
            Arc::new(SystemClock),
            &Config::default(),
        )
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Current unix time from the context clock
    pub fn now(&self) -> u64 {
        self.clock.now_unix()
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("fast_store", &self.fast.backend())
            .field("clock", &self.clock)
            .field("cache", &self.cache)
            .field("rate_limit", &self.rate_limit)
            .finish_non_exhaustive()
    }
}
