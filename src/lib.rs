//! # config-center-rs
//!
//! Configuration cache and rate-limit counter layer that sits between a
//! relational system of record and a request-routing data plane.
//!
//! ## Features
//!
//! - **Cache-aside reads**: namespaces, rules, matchers, upstreams and locations
//!   are served from the fast store and repopulated in the background on a miss
//! - **Dual writes**: every mutation lands in the relational store first, then
//!   in the cache keys the data plane reads directly
//! - **Counter resets**: a rule change that alters a quota zeroes the live
//!   counters of the namespace before the write returns
//! - **Fixed-window counters**: token and QPS windows plus a concurrency gauge
//! - **Usage views**: per-counter usage, namespace overviews and timelines
//! - **Drift control**: a periodic snapshot sync bounds cache staleness
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use config_center::{Config, ConfigCenter, EntityType, Lookup};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/config-center.yaml").await?;
//!     let center = ConfigCenter::init(config).await?;
//!
//!     let wechat = center
//!         .read_through(EntityType::Namespaces, Lookup::Code("wechat".into()))
//!         .await?;
//!     println!("{:?}", wechat);
//!
//!     center.shutdown().await;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![allow(missing_doc_code_examples)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{ConfigCenterError, Result};

pub use core::AppContext;
pub use core::cache::{
    BatchWriteReport, CacheReader, DualWriteMutator, EntityType, Lookup, Record, SyncReport, WriteOp,
    WriteSummary,
};
pub use core::models::{CounterKind, Status};
pub use core::rate_limiter::{CounterEngine, CounterUsage, RateLimitDecision, TimeWindow};
pub use core::reporter::{Sample, UsageReporter};
pub use storage::{FastStoreStats, StorageHealthStatus, StorageLayer};

use futures::Stream;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use utils::SystemClock;

/// Entry point used by API handlers and the binary
///
/// Owns the process-wide store handles through its [`AppContext`]. Create it
/// once with [`ConfigCenter::init`] and tear it down with
/// [`ConfigCenter::shutdown`].
pub struct ConfigCenter {
    ctx: AppContext,
    reader: CacheReader,
    mutator: DualWriteMutator,
    counters: CounterEngine,
    reporter: UsageReporter,
    shutdown: watch::Sender<bool>,
    sync_loop: Mutex<Option<JoinHandle<()>>>,
}

impl ConfigCenter {
    /// Connect both stores and build the context
    pub async fn init(config: Config) -> Result<Self> {
        info!("Initializing config center");
        let clock = Arc::new(SystemClock);
        let storage = StorageLayer::new(&config.storage, clock.clone()).await?;
        Ok(Self::from_context(AppContext::new(storage, clock, &config)))
    }

    /// Wrap an existing context
    pub fn from_context(ctx: AppContext) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            reader: CacheReader::new(ctx.clone()),
            mutator: DualWriteMutator::new(ctx.clone()),
            counters: CounterEngine::new(ctx.clone()),
            reporter: UsageReporter::new(ctx.clone()),
            ctx,
            shutdown,
            sync_loop: Mutex::new(None),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn reader(&self) -> &CacheReader {
        &self.reader
    }

    pub fn mutator(&self) -> &DualWriteMutator {
        &self.mutator
    }

    pub fn counters(&self) -> &CounterEngine {
        &self.counters
    }

    pub fn reporter(&self) -> &UsageReporter {
        &self.reporter
    }

    /// Read a record or list through the cache
    ///
    /// `Ok(None)` means the record exists in neither store.
    pub async fn read_through(&self, entity: EntityType, lookup: Lookup) -> Result<Option<Record>> {
        self.reader.lookup(entity, lookup).await
    }

    /// Apply one mutation to the relational store and then the cache
    pub async fn write_dual_write(&self, op: WriteOp) -> Result<WriteSummary> {
        self.mutator.apply_op(op).await
    }

    /// Apply mutations in order; a failure does not stop the rest
    pub async fn batch_dual_write(&self, ops: Vec<WriteOp>) -> BatchWriteReport {
        self.mutator.batch(ops).await
    }

    /// Usage of one counter of a namespace
    ///
    /// `window` is a `30m` / `1h` / `1d` style size that replaces the rule's
    /// own window for windowed counters.
    pub async fn get_counter_usage(
        &self,
        namespace_id: i32,
        kind: CounterKind,
        window: Option<&str>,
    ) -> Result<CounterUsage> {
        self.reporter
            .counter_usage(namespace_id, kind, window.map(TimeWindow::parse))
            .await
    }

    /// Lazy timeline of the last `bucket_count` windows, oldest first
    pub fn get_timeline(
        &self,
        namespace_id: i32,
        kind: CounterKind,
        bucket_count: usize,
        bucket_size: u64,
    ) -> impl Stream<Item = Result<Sample>> + Send + 'static {
        core::reporter::timeline(&self.ctx, namespace_id, kind, bucket_count, bucket_size)
    }

    /// Add `amount` to the current window of a counter
    pub async fn increment(&self, namespace_id: i32, kind: CounterKind, amount: u64) -> Result<u64> {
        self.counters.increment(namespace_id, kind, amount).await
    }

    /// Compare a counter against `max`; 0 means unlimited
    pub async fn check(&self, namespace_id: i32, kind: CounterKind, max: u64) -> Result<RateLimitDecision> {
        self.counters.check(namespace_id, kind, max).await
    }

    /// Copy the full relational snapshot into the fast store once
    pub async fn sync_once(&self) -> Result<SyncReport> {
        core::cache::sync_once(&self.ctx).await
    }

    /// Start the periodic snapshot sync
    ///
    /// A second call is a no-op, and so is a call after [`shutdown`](Self::shutdown).
    pub fn start_sync(&self) {
        let mut slot = self.sync_loop.lock();
        if slot.is_some() {
            return;
        }
        if *self.shutdown.borrow() {
            warn!("Config center is shut down, not starting sync");
            return;
        }
        let interval = Duration::from_secs(self.ctx.cache.sync_interval);
        *slot = Some(core::cache::spawn_sync_loop(
            self.ctx.clone(),
            interval,
            self.shutdown.subscribe(),
        ));
    }

    pub async fn health(&self) -> StorageHealthStatus {
        StorageLayer::from_parts(self.ctx.store.clone(), self.ctx.fast.clone())
            .health_check()
            .await
    }

    /// Hit and memory statistics of the fast store
    pub async fn cache_stats(&self) -> Result<FastStoreStats> {
        self.ctx.fast.stats().await
    }

    /// Stop the sync loop and wait for pending cache writes
    pub async fn shutdown(&self) {
        info!("Shutting down config center");
        let _ = self.shutdown.send(true);

        let handle = self.sync_loop.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("Sync loop ended abnormally: {}", e);
            }
        }

        self.ctx.tasks.drain().await;
    }
}

impl std::fmt::Debug for ConfigCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigCenter")
            .field("ctx", &self.ctx)
            .field("sync_running", &self.sync_loop.lock().is_some())
            .finish_non_exhaustive()
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
