//! Rate-limit counters
//!
//! Fixed-window counters for token and QPS limits, a concurrency gauge, and
//! the change detection and reset that keep counters honest when quotas change.

mod change;
mod counter;
mod reset;
mod types;
mod usage;
mod window;

#[cfg(test)]
mod tests;

pub use change::changed;
pub use counter::CounterEngine;
pub use reset::{ResetReport, reset_on_change};
pub use types::RateLimitDecision;
pub use usage::{CounterUsage, DEFAULT_USAGE_WINDOW_SECS, TimeWindow, usage_percent};
pub use window::Window;
