//! Rate limiting configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Counter window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Seconds a counter key outlives its window, for trailing reads
    #[serde(default = "default_grace_period")]
    pub grace_period: u64,
    /// Token window size used when a rule does not set one
    #[serde(default = "default_token_window")]
    pub token_window: u64,
    /// QPS window size used when a rule does not set one
    #[serde(default = "default_qps_window")]
    pub qps_window: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            grace_period: default_grace_period(),
            token_window: default_token_window(),
            qps_window: default_qps_window(),
        }
    }
}
