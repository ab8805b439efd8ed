//! Rules (policies) attached to a namespace
//!
//! The configuration payload is a tagged union keyed by `rule_type`. On the
//! wire a rule looks like
//! `{"rule_id": 7, "rule_type": "token_limit", "rule_config": {"max_tokens": 100000}, ...}`,
//! which is the layout the data plane reads from `config:rules:<namespace_id>`.

use super::{Status, Timestamp};
use crate::config::RateLimitConfig;
use crate::utils::error::{ConfigCenterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Matcher,
    TokenLimit,
    QpsLimit,
    ConcurrentLimit,
}

impl RuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::Matcher => "matcher",
            RuleKind::TokenLimit => "token_limit",
            RuleKind::QpsLimit => "qps_limit",
            RuleKind::ConcurrentLimit => "concurrent_limit",
        }
    }

    /// The counter a rule of this kind gates on, if any
    pub fn counter_kind(self) -> Option<CounterKind> {
        match self {
            RuleKind::Matcher => None,
            RuleKind::TokenLimit => Some(CounterKind::Token),
            RuleKind::QpsLimit => Some(CounterKind::Qps),
            RuleKind::ConcurrentLimit => Some(CounterKind::Concurrent),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counter families kept in the fast store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    /// Tokens consumed per window
    Token,
    /// Requests per window
    Qps,
    /// In-flight requests, not windowed
    Concurrent,
}

impl CounterKind {
    /// Segment used in `rate_limit:<ns>:<kind>:<window>` keys
    pub fn as_str(self) -> &'static str {
        match self {
            CounterKind::Token => "token",
            CounterKind::Qps => "qps",
            CounterKind::Concurrent => "concurrent",
        }
    }

    pub fn is_windowed(self) -> bool {
        !matches!(self, CounterKind::Concurrent)
    }
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherRule {
    pub matcher_type: String,
    pub match_field: String,
    pub match_operator: String,
    pub match_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLimit {
    #[serde(alias = "max_tokens_per_hour", alias = "max_tokens_per_window")]
    pub max_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QpsLimit {
    #[serde(alias = "max_qps", alias = "max_requests_per_minute")]
    pub max_requests: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrentLimit {
    #[serde(alias = "max_connections")]
    pub max_concurrent: u64,
}

/// Typed rule configuration
///
/// Equality is structural, so two payloads that differ only in key order or
/// whitespace compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule_type", content = "rule_config", rename_all = "snake_case")]
pub enum RuleConfig {
    Matcher(MatcherRule),
    TokenLimit(TokenLimit),
    QpsLimit(QpsLimit),
    ConcurrentLimit(ConcurrentLimit),
}

/// A resolved limit: which counter, how high, over what window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub kind: CounterKind,
    /// 0 means unlimited
    pub max: u64,
    /// Window size in seconds; 0 for the concurrency gauge
    pub window_seconds: u64,
}

impl RuleConfig {
    pub fn kind(&self) -> RuleKind {
        match self {
            RuleConfig::Matcher(_) => RuleKind::Matcher,
            RuleConfig::TokenLimit(_) => RuleKind::TokenLimit,
            RuleConfig::QpsLimit(_) => RuleKind::QpsLimit,
            RuleConfig::ConcurrentLimit(_) => RuleKind::ConcurrentLimit,
        }
    }

    /// Parse a stored `(rule_type, rule_config)` pair
    pub fn from_parts(rule_type: &str, raw_config: &str) -> std::result::Result<Self, String> {
        let config: serde_json::Value =
            serde_json::from_str(raw_config).map_err(|e| format!("rule_config is not valid JSON: {}", e))?;
        serde_json::from_value(serde_json::json!({
            "rule_type": rule_type,
            "rule_config": config,
        }))
        .map_err(|e| format!("rule_config does not fit rule_type '{}': {}", rule_type, e))
    }

    /// The `rule_config` column value
    pub fn config_json(&self) -> Result<String> {
        let json = match self {
            RuleConfig::Matcher(c) => serde_json::to_string(c)?,
            RuleConfig::TokenLimit(c) => serde_json::to_string(c)?,
            RuleConfig::QpsLimit(c) => serde_json::to_string(c)?,
            RuleConfig::ConcurrentLimit(c) => serde_json::to_string(c)?,
        };
        Ok(json)
    }

    /// Write-time checks beyond what the types already enforce
    pub fn validate(&self) -> Result<()> {
        let window = match self {
            RuleConfig::TokenLimit(c) => c.window_seconds,
            RuleConfig::QpsLimit(c) => c.window_seconds,
            RuleConfig::Matcher(m) => {
                if m.match_field.trim().is_empty() {
                    return Err(ConfigCenterError::validation("matcher rule needs a match_field"));
                }
                None
            }
            RuleConfig::ConcurrentLimit(_) => None,
        };
        if window == Some(0) {
            return Err(ConfigCenterError::validation("window_seconds must be greater than 0"));
        }
        Ok(())
    }

    /// The quota this configuration imposes, with window defaults filled in
    pub fn quota(&self, defaults: &RateLimitConfig) -> Option<Quota> {
        match self {
            RuleConfig::Matcher(_) => None,
            RuleConfig::TokenLimit(c) => Some(Quota {
                kind: CounterKind::Token,
                max: c.max_tokens,
                window_seconds: c.window_seconds.unwrap_or(defaults.token_window),
            }),
            RuleConfig::QpsLimit(c) => Some(Quota {
                kind: CounterKind::Qps,
                max: c.max_requests,
                window_seconds: c.window_seconds.unwrap_or(defaults.qps_window),
            }),
            RuleConfig::ConcurrentLimit(c) => Some(Quota {
                kind: CounterKind::Concurrent,
                max: c.max_concurrent,
                window_seconds: 0,
            }),
        }
    }
}

/// A stored rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub rule_id: i32,
    /// `None` for a global policy
    #[serde(default)]
    pub namespace_id: Option<i32>,
    pub rule_name: String,
    #[serde(flatten)]
    pub config: RuleConfig,
    pub priority: i32,
    pub status: Status,
    pub create_time: Timestamp,
    pub update_time: Timestamp,
}

impl Rule {
    pub fn kind(&self) -> RuleKind {
        self.config.kind()
    }
}

/// Sort a rule set the way it is cached: priority, then id
pub fn sort_rules(rules: &mut [Rule]) {
    rules.sort_by_key(|r| (r.priority, r.rule_id));
}

/// Payload for creating a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRule {
    #[serde(default)]
    pub namespace_id: Option<i32>,
    pub rule_name: String,
    #[serde(flatten)]
    pub config: RuleConfig,
    #[serde(default = "default_rule_priority")]
    pub priority: i32,
    #[serde(default)]
    pub status: Status,
}

fn default_rule_priority() -> i32 {
    100
}

impl NewRule {
    pub fn new(namespace_id: Option<i32>, rule_name: impl Into<String>, config: RuleConfig) -> Self {
        Self {
            namespace_id,
            rule_name: rule_name.into(),
            config,
            priority: default_rule_priority(),
            status: Status::Enabled,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rule_name.trim().is_empty() {
            return Err(ConfigCenterError::validation("rule_name cannot be empty"));
        }
        self.config.validate()
    }
}

/// Partial update of a rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulePatch {
    #[serde(default)]
    pub rule_name: Option<String>,
    #[serde(default)]
    pub config: Option<RuleConfig>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub status: Option<Status>,
}

impl RulePatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.rule_name {
            if name.trim().is_empty() {
                return Err(ConfigCenterError::validation("rule_name cannot be empty"));
            }
        }
        if let Some(config) = &self.config {
            config.validate()?;
        }
        Ok(())
    }
}
