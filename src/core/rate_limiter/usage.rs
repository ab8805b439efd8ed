//! Usage arithmetic over counter values

use super::window::Window;
use serde::{Deserialize, Serialize};

/// Window used when a usage window string cannot be parsed
pub const DEFAULT_USAGE_WINDOW_SECS: u64 = 30 * 60;

/// A usage window such as `30m`, `1h` or `1d`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub seconds: u64,
}

impl TimeWindow {
    pub fn from_secs(seconds: u64) -> Self {
        Self { seconds }
    }

    /// Parse `<n>m`, `<n>h` or `<n>d`; anything else means 30 minutes
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        let Some(unit) = spec.chars().last() else {
            return Self::default();
        };
        let multiplier = match unit {
            'm' => 60,
            'h' => 3600,
            'd' => 86_400,
            _ => return Self::default(),
        };
        match spec[..spec.len() - 1].parse::<u64>() {
            Ok(n) if n > 0 => n
                .checked_mul(multiplier)
                .map(Self::from_secs)
                .unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            seconds: DEFAULT_USAGE_WINDOW_SECS,
        }
    }
}

/// Current value of a counter against its limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterUsage {
    pub current: u64,
    /// 0 means unlimited
    pub max: u64,
    /// Percent of `max` used; 0 when unlimited, above 100 when over the limit
    pub percent: f64,
    pub remaining: u64,
    /// Absent for the concurrency gauge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_start: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_end: Option<u64>,
}

impl CounterUsage {
    pub fn new(current: u64, max: u64, window: Option<Window>) -> Self {
        Self {
            current,
            max,
            percent: usage_percent(current, max),
            remaining: max.saturating_sub(current),
            window_start: window.map(|w| w.start),
            window_end: window.map(|w| w.end()),
        }
    }

    pub fn is_exceeded(&self) -> bool {
        self.max > 0 && self.current > self.max
    }
}

/// `current / max * 100`, with `max == 0` reported as 0
///
/// Not rounded: one unit over a large limit must still read above 100.
pub fn usage_percent(current: u64, max: u64) -> f64 {
    if max == 0 {
        return 0.0;
    }
    current as f64 / max as f64 * 100.0
}
