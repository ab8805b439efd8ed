//! Rate limiter result types

use crate::core::models::CounterKind;
use serde::{Deserialize, Serialize};

/// Outcome of checking a counter against its limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitDecision {
    pub kind: CounterKind,
    /// Whether the request is allowed
    pub allowed: bool,
    /// Current counter value
    pub current: u64,
    /// Maximum allowed, 0 for unlimited
    pub limit: u64,
    /// Remaining headroom in the window
    pub remaining: u64,
    /// Seconds until the window rolls over; absent for the concurrency gauge
    pub reset_after_secs: Option<u64>,
}

impl RateLimitDecision {
    /// Equality with the limit is allowed; only exceeding it is rejected
    pub fn evaluate(kind: CounterKind, current: u64, limit: u64, reset_after_secs: Option<u64>) -> Self {
        let allowed = limit == 0 || current <= limit;
        Self {
            kind,
            allowed,
            current,
            limit,
            remaining: limit.saturating_sub(current),
            reset_after_secs,
        }
    }

    /// How long a rejected caller should wait
    pub fn retry_after_secs(&self) -> Option<u64> {
        if self.allowed { None } else { self.reset_after_secs }
    }
}
