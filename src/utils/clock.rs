//! Time sources
//!
//! Window arithmetic and the in-memory fast store read "now" through a
//! [`Clock`] so tests can move time forward without sleeping.

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A source of wall-clock time in whole unix seconds
pub trait Clock: Debug + Send + Sync {
    /// Seconds since the unix epoch
    fn now_unix(&self) -> u64;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock frozen at `unix_secs`
    pub fn starting_at(unix_secs: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(unix_secs)),
        }
    }

    /// Advances the clock by the given amount
    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_secs(), Ordering::AcqRel);
    }

    /// Jump to an absolute time
    pub fn set(&self, unix_secs: u64) {
        self.now.store(unix_secs, Ordering::Release);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}
