//! Configuration data models
//!
//! This module defines all configuration structures used by the config center.

#![allow(missing_docs)]

pub mod cache;
pub mod logging;
pub mod rate_limit;
pub mod retry;
pub mod storage;

// Re-export all configuration types
pub use cache::*;
pub use logging::*;
pub use rate_limit::*;
pub use retry::*;
pub use storage::*;

/// Default database URL
pub fn default_database_url() -> String {
    "sqlite://config_center.db?mode=rwc".to_string()
}

/// Default Redis URL
pub fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

pub fn default_max_connections() -> u32 {
    10
}

pub fn default_connection_timeout() -> u64 {
    5
}

pub fn default_namespace_ttl() -> u64 {
    3600
}

pub fn default_matcher_ttl() -> u64 {
    3600
}

pub fn default_rule_ttl() -> u64 {
    1800
}

pub fn default_upstream_ttl() -> u64 {
    1800
}

pub fn default_location_ttl() -> u64 {
    1800
}

pub fn default_temp_key_ttl() -> u64 {
    60
}

pub fn default_sync_interval() -> u64 {
    30
}

pub fn default_grace_period() -> u64 {
    60
}

pub fn default_token_window() -> u64 {
    3600
}

pub fn default_qps_window() -> u64 {
    60
}

pub fn default_max_attempts() -> u32 {
    2
}

pub fn default_base_delay() -> u64 {
    50
}

pub fn default_max_delay() -> u64 {
    1000
}

pub fn default_backoff_multiplier() -> f64 {
    2.0
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}
