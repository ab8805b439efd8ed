//! Fast store key layout
//!
//! The data plane reads these keys directly, so the formats are a wire
//! contract and must not change.

use crate::core::models::CounterKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Display;
use uuid::Uuid;

/// Entity families cached under `config:<entity>:...`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Namespaces,
    /// Per-namespace ordered rule sets
    Rules,
    /// Single rules by id, and the list of every rule
    Policies,
    Matchers,
    Upstreams,
    Locations,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Namespaces => "namespaces",
            EntityType::Rules => "rules",
            EntityType::Policies => "policies",
            EntityType::Matchers => "matchers",
            EntityType::Upstreams => "upstreams",
            EntityType::Locations => "locations",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `config:<entity>:<id>`
pub fn entity_key(entity: EntityType, id: impl Display) -> String {
    format!("config:{}:{}", entity, id)
}

/// `config:<entity>:list`
pub fn list_key(entity: EntityType) -> String {
    format!("config:{}:list", entity)
}

pub fn namespace_key(namespace_id: i32) -> String {
    entity_key(EntityType::Namespaces, namespace_id)
}

/// Codes are never purely numeric, so this cannot collide with [`namespace_key`]
pub fn namespace_code_key(code: &str) -> String {
    entity_key(EntityType::Namespaces, code)
}

pub fn rules_key(namespace_id: i32) -> String {
    entity_key(EntityType::Rules, namespace_id)
}

pub fn policy_key(rule_id: i32) -> String {
    entity_key(EntityType::Policies, rule_id)
}

pub fn matchers_key(namespace_id: i32) -> String {
    entity_key(EntityType::Matchers, namespace_id)
}

pub fn upstream_key(server_id: i32) -> String {
    entity_key(EntityType::Upstreams, server_id)
}

pub fn location_key(location_id: i32) -> String {
    entity_key(EntityType::Locations, location_id)
}

/// A fresh staging key, `temp:<entity>:<uuid>`
pub fn temp_key(entity: EntityType) -> String {
    format!("temp:{}:{}", entity, Uuid::new_v4())
}

/// `rate_limit:<namespace>:<kind>:<window_start>`
pub fn counter_key(namespace_id: i32, kind: CounterKind, window_start: u64) -> String {
    format!("rate_limit:{}:{}:{}", namespace_id, kind, window_start)
}

/// Glob matching every window of one counter family
pub fn counter_pattern(namespace_id: i32, kind: CounterKind) -> String {
    format!("rate_limit:{}:{}:*", namespace_id, kind)
}

/// `concurrent:<namespace>:current`
pub fn concurrent_key(namespace_id: i32) -> String {
    format!("concurrent:{}:current", namespace_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_keys() {
        assert_eq!(namespace_key(1), "config:namespaces:1");
        assert_eq!(namespace_code_key("wechat"), "config:namespaces:wechat");
        assert_eq!(list_key(EntityType::Namespaces), "config:namespaces:list");
        assert_eq!(rules_key(1), "config:rules:1");
        assert_eq!(policy_key(7), "config:policies:7");
        assert_eq!(list_key(EntityType::Policies), "config:policies:list");
        assert_eq!(matchers_key(3), "config:matchers:3");
        assert_eq!(upstream_key(2), "config:upstreams:2");
        assert_eq!(location_key(5), "config:locations:5");
    }

    #[test]
    fn test_counter_keys() {
        assert_eq!(
            counter_key(1, CounterKind::Token, 1_700_000_400),
            "rate_limit:1:token:1700000400"
        );
        assert_eq!(counter_key(1, CounterKind::Qps, 60), "rate_limit:1:qps:60");
        assert_eq!(counter_pattern(1, CounterKind::Qps), "rate_limit:1:qps:*");
        assert_eq!(concurrent_key(9), "concurrent:9:current");
    }

    #[test]
    fn test_temp_keys_are_unique() {
        let a = temp_key(EntityType::Rules);
        let b = temp_key(EntityType::Rules);
        assert!(a.starts_with("temp:rules:"));
        assert_ne!(a, b);
    }
}
