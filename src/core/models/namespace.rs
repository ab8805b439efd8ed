//! Namespace records
//!
//! A namespace is a traffic segment (tenant or channel). Its code is the
//! immutable business key the data plane looks namespaces up by.

use super::{Matcher, Status, Timestamp};
use crate::utils::error::{ConfigCenterError, Result};
use serde::{Deserialize, Serialize};

/// Longest accepted namespace code
pub const MAX_NAMESPACE_CODE_LEN: usize = 50;

/// Shares the key space with `config:namespaces:list`
const RESERVED_LIST_SEGMENT: &str = "list";

/// A stored namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub namespace_id: i32,
    pub namespace_code: String,
    pub namespace_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: Status,
    pub create_time: Timestamp,
    pub update_time: Timestamp,
}

/// Matcher created alongside a new namespace
///
/// When absent, the namespace gets a header matcher on `channelcode`
/// equal to its own code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherTemplate {
    pub matcher_type: String,
    pub match_field: String,
    pub match_operator: String,
    /// Defaults to the namespace code
    #[serde(default)]
    pub match_value: Option<String>,
    #[serde(default = "default_matcher_priority")]
    pub priority: i32,
}

fn default_matcher_priority() -> i32 {
    100
}

impl MatcherTemplate {
    /// The matcher every namespace gets unless told otherwise
    pub fn channel_code() -> Self {
        Self {
            matcher_type: "header".to_string(),
            match_field: "channelcode".to_string(),
            match_operator: "equals".to_string(),
            match_value: None,
            priority: default_matcher_priority(),
        }
    }
}

/// Payload for creating a namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNamespace {
    pub namespace_code: String,
    pub namespace_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub matcher: Option<MatcherTemplate>,
}

impl NewNamespace {
    /// Minimal payload with the given code and name
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace_code: code.into(),
            namespace_name: name.into(),
            description: None,
            status: Status::Enabled,
            matcher: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_namespace_code(&self.namespace_code)?;
        if self.namespace_name.trim().is_empty() {
            return Err(ConfigCenterError::validation("namespace_name cannot be empty"));
        }
        Ok(())
    }
}

/// Partial update of a namespace. The code cannot change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespacePatch {
    #[serde(default)]
    pub namespace_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
}

impl NamespacePatch {
    pub fn is_empty(&self) -> bool {
        self.namespace_name.is_none() && self.description.is_none() && self.status.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.namespace_name {
            if name.trim().is_empty() {
                return Err(ConfigCenterError::validation("namespace_name cannot be empty"));
            }
        }
        Ok(())
    }
}

/// A namespace together with its first matcher
///
/// This is what the data plane reads at `config:namespaces:<code>` and in
/// `config:namespaces:list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceSnapshot {
    #[serde(flatten)]
    pub namespace: Namespace,
    #[serde(default)]
    pub matcher: Option<Matcher>,
}

impl NamespaceSnapshot {
    /// Pair a namespace with the first of its matchers (lowest priority)
    pub fn from_parts(namespace: Namespace, matchers: &[Matcher]) -> Self {
        let matcher = matchers
            .iter()
            .min_by_key(|m| (m.priority, m.matcher_id))
            .cloned();
        Self { namespace, matcher }
    }
}

/// Checks a namespace code is usable as a cache key segment
///
/// Purely numeric codes are refused so `config:namespaces:<code>` never
/// collides with `config:namespaces:<id>`.
pub fn validate_namespace_code(code: &str) -> Result<()> {
    if code.is_empty() {
        return Err(ConfigCenterError::validation("namespace_code cannot be empty"));
    }
    if code.len() > MAX_NAMESPACE_CODE_LEN {
        return Err(ConfigCenterError::validation(format!(
            "namespace_code cannot exceed {} characters",
            MAX_NAMESPACE_CODE_LEN
        )));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigCenterError::validation(
            "namespace_code may only contain letters, digits, '_' and '-'",
        ));
    }
    if code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigCenterError::validation("namespace_code cannot be purely numeric"));
    }
    if code == RESERVED_LIST_SEGMENT {
        return Err(ConfigCenterError::validation("namespace_code 'list' is reserved"));
    }
    Ok(())
}
