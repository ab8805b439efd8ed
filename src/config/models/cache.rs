//! Cache configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fast store TTLs and the resync interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL for `config:namespaces:*` keys, in seconds
    #[serde(default = "default_namespace_ttl")]
    pub namespace_ttl: u64,
    /// TTL for `config:matchers:*` keys
    #[serde(default = "default_matcher_ttl")]
    pub matcher_ttl: u64,
    /// TTL for `config:rules:*` and `config:policies:*` keys
    #[serde(default = "default_rule_ttl")]
    pub rule_ttl: u64,
    /// TTL for `config:upstreams:*` keys
    #[serde(default = "default_upstream_ttl")]
    pub upstream_ttl: u64,
    /// TTL for `config:locations:*` keys
    #[serde(default = "default_location_ttl")]
    pub location_ttl: u64,
    /// TTL for `temp:*` staging keys
    #[serde(default = "default_temp_key_ttl")]
    pub temp_key_ttl: u64,
    /// Interval between full snapshot syncs, in seconds
    #[serde(default = "default_sync_interval")]
    pub sync_interval: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace_ttl: default_namespace_ttl(),
            matcher_ttl: default_matcher_ttl(),
            rule_ttl: default_rule_ttl(),
            upstream_ttl: default_upstream_ttl(),
            location_ttl: default_location_ttl(),
            temp_key_ttl: default_temp_key_ttl(),
            sync_interval: default_sync_interval(),
        }
    }
}

impl CacheConfig {
    /// Sync interval as a [`Duration`]
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval)
    }

    /// All TTLs paired with their names, for validation
    pub(crate) fn ttls(&self) -> [(&'static str, u64); 6] {
        [
            ("namespace_ttl", self.namespace_ttl),
            ("matcher_ttl", self.matcher_ttl),
            ("rule_ttl", self.rule_ttl),
            ("upstream_ttl", self.upstream_ttl),
            ("location_ttl", self.location_ttl),
            ("temp_key_ttl", self.temp_key_ttl),
        ]
    }
}
