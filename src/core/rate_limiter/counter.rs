//! Time-windowed counters in the fast store

use super::types::RateLimitDecision;
use super::window::Window;
use crate::core::cache::keys;
use crate::core::context::AppContext;
use crate::core::models::{CounterKind, Quota};
use crate::utils::error::Result;
use tracing::{debug, warn};

/// Token, QPS and concurrency counters for namespaces
///
/// Windowed counters live at `rate_limit:<ns>:<kind>:<window_start>` and
/// expire `grace_period` seconds after their window ends. The concurrency
/// gauge lives at `concurrent:<ns>:current` and never expires.
#[derive(Debug, Clone)]
pub struct CounterEngine {
    ctx: AppContext,
}

impl CounterEngine {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Window size used for a kind when the rule does not set one
    pub fn default_window(&self, kind: CounterKind) -> u64 {
        match kind {
            CounterKind::Token => self.ctx.rate_limit.token_window,
            CounterKind::Qps => self.ctx.rate_limit.qps_window,
            CounterKind::Concurrent => 0,
        }
    }

    /// The window containing the current time
    pub fn current_window(&self, window_seconds: u64) -> Window {
        Window::containing(self.ctx.now(), window_seconds)
    }

    /// Key of the live counter for a kind
    pub fn current_key(&self, namespace_id: i32, kind: CounterKind, window_seconds: u64) -> String {
        match kind {
            CounterKind::Concurrent => keys::concurrent_key(namespace_id),
            _ => keys::counter_key(namespace_id, kind, self.current_window(window_seconds).start),
        }
    }

    /// Add `amount` to the current window using the default window size
    pub async fn increment(&self, namespace_id: i32, kind: CounterKind, amount: u64) -> Result<u64> {
        self.increment_in(namespace_id, kind, amount, self.default_window(kind))
            .await
    }

    /// Add `amount` to the current window of `window_seconds`
    pub async fn increment_in(
        &self,
        namespace_id: i32,
        kind: CounterKind,
        amount: u64,
        window_seconds: u64,
    ) -> Result<u64> {
        let delta = i64::try_from(amount).unwrap_or(i64::MAX);
        let value = match kind {
            CounterKind::Concurrent => {
                self.ctx
                    .fast
                    .increment(&keys::concurrent_key(namespace_id), delta)
                    .await?
            }
            _ => {
                let window = self.current_window(window_seconds);
                let key = keys::counter_key(namespace_id, kind, window.start);
                self.ctx
                    .fast
                    .increment_until(&key, delta, window.expire_at(self.ctx.rate_limit.grace_period))
                    .await?
            }
        };
        debug!(
            "Counter {}:{} +{} -> {}",
            namespace_id, kind, amount, value
        );
        Ok(non_negative(value))
    }

    /// Current value using the default window size
    pub async fn read(&self, namespace_id: i32, kind: CounterKind) -> Result<u64> {
        self.read_in(namespace_id, kind, self.default_window(kind)).await
    }

    /// Current value in the window of `window_seconds`; 0 when absent or expired
    pub async fn read_in(&self, namespace_id: i32, kind: CounterKind, window_seconds: u64) -> Result<u64> {
        let key = self.current_key(namespace_id, kind, window_seconds);
        self.read_key(&key).await
    }

    /// Value of the counter for a specific window start
    pub async fn read_window(&self, namespace_id: i32, kind: CounterKind, window_start: u64) -> Result<u64> {
        let key = match kind {
            CounterKind::Concurrent => keys::concurrent_key(namespace_id),
            _ => keys::counter_key(namespace_id, kind, window_start),
        };
        self.read_key(&key).await
    }

    async fn read_key(&self, key: &str) -> Result<u64> {
        let Some(raw) = self.ctx.fast.get(key).await? else {
            return Ok(0);
        };
        match raw.trim().parse::<i64>() {
            Ok(value) => Ok(non_negative(value)),
            Err(_) => {
                warn!("Counter {} holds a non-integer value, reading as 0", key);
                Ok(0)
            }
        }
    }

    /// Record one more in-flight request
    pub async fn acquire_concurrent(&self, namespace_id: i32) -> Result<u64> {
        self.increment(namespace_id, CounterKind::Concurrent, 1).await
    }

    /// Record a finished request; the gauge never goes below 0
    pub async fn release_concurrent(&self, namespace_id: i32) -> Result<u64> {
        let key = keys::concurrent_key(namespace_id);
        let value = self.ctx.fast.increment(&key, -1).await?;
        if value < 0 {
            self.ctx.fast.set(&key, "0", None).await?;
            return Ok(0);
        }
        Ok(value as u64)
    }

    /// Compare the current value with `max` over the default window
    pub async fn check(&self, namespace_id: i32, kind: CounterKind, max: u64) -> Result<RateLimitDecision> {
        self.check_quota(
            namespace_id,
            &Quota {
                kind,
                max,
                window_seconds: self.default_window(kind),
            },
        )
        .await
    }

    /// Compare the current value with a rule's quota
    pub async fn check_quota(&self, namespace_id: i32, quota: &Quota) -> Result<RateLimitDecision> {
        let current = self.read_in(namespace_id, quota.kind, quota.window_seconds).await?;
        let reset_after = quota.kind.is_windowed().then(|| {
            let window = self.current_window(quota.window_seconds);
            window.end().saturating_sub(self.ctx.now())
        });
        let decision = RateLimitDecision::evaluate(quota.kind, current, quota.max, reset_after);
        if !decision.allowed {
            debug!(
                "Namespace {} over {} limit: {} > {}",
                namespace_id, quota.kind, current, quota.max
            );
        }
        Ok(decision)
    }
}

fn non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
