//! Location (routing) rules

use super::{Status, Timestamp};
use crate::utils::error::{ConfigCenterError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub location_id: i32,
    pub path: String,
    pub upstream_id: i32,
    pub proxy_cache: bool,
    pub proxy_buffering: bool,
    #[serde(default)]
    pub proxy_pass: Option<String>,
    pub is_regex: bool,
    #[serde(default)]
    pub limit_req_config: Option<serde_json::Value>,
    pub sse_support: bool,
    pub chunked_transfer: bool,
    pub matcher_type: String,
    #[serde(default)]
    pub match_field: Option<String>,
    #[serde(default)]
    pub match_operator: Option<String>,
    #[serde(default)]
    pub match_value: Option<String>,
    #[serde(default)]
    pub add_headers: Option<serde_json::Value>,
    #[serde(default)]
    pub rewrite_path: Option<String>,
    pub priority: i32,
    pub status: Status,
    pub create_time: Timestamp,
    pub update_time: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLocation {
    pub path: String,
    pub upstream_id: i32,
    #[serde(default)]
    pub proxy_cache: bool,
    #[serde(default)]
    pub proxy_buffering: bool,
    #[serde(default)]
    pub proxy_pass: Option<String>,
    #[serde(default)]
    pub is_regex: bool,
    #[serde(default)]
    pub limit_req_config: Option<serde_json::Value>,
    #[serde(default)]
    pub sse_support: bool,
    #[serde(default)]
    pub chunked_transfer: bool,
    #[serde(default = "default_matcher_type")]
    pub matcher_type: String,
    #[serde(default)]
    pub match_field: Option<String>,
    #[serde(default)]
    pub match_operator: Option<String>,
    #[serde(default)]
    pub match_value: Option<String>,
    #[serde(default)]
    pub add_headers: Option<serde_json::Value>,
    #[serde(default)]
    pub rewrite_path: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default)]
    pub status: Status,
}

fn default_matcher_type() -> String {
    "path".to_string()
}

fn default_priority() -> i32 {
    100
}

impl NewLocation {
    /// A plain prefix location pointing at `upstream_id`
    pub fn new(path: impl Into<String>, upstream_id: i32) -> Self {
        Self {
            path: path.into(),
            upstream_id,
            proxy_cache: false,
            proxy_buffering: false,
            proxy_pass: None,
            is_regex: false,
            limit_req_config: None,
            sse_support: false,
            chunked_transfer: false,
            matcher_type: default_matcher_type(),
            match_field: None,
            match_operator: None,
            match_value: None,
            add_headers: None,
            rewrite_path: None,
            priority: default_priority(),
            status: Status::Enabled,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(ConfigCenterError::validation("path cannot be empty"));
        }
        if self.is_regex {
            regex::Regex::new(&self.path)
                .map_err(|e| ConfigCenterError::validation(format!("invalid path regex: {}", e)))?;
        } else if !self.path.starts_with('/') {
            return Err(ConfigCenterError::validation("path must start with '/'"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationPatch {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub upstream_id: Option<i32>,
    #[serde(default)]
    pub proxy_cache: Option<bool>,
    #[serde(default)]
    pub proxy_buffering: Option<bool>,
    #[serde(default)]
    pub proxy_pass: Option<String>,
    #[serde(default)]
    pub is_regex: Option<bool>,
    #[serde(default)]
    pub limit_req_config: Option<serde_json::Value>,
    #[serde(default)]
    pub sse_support: Option<bool>,
    #[serde(default)]
    pub chunked_transfer: Option<bool>,
    #[serde(default)]
    pub add_headers: Option<serde_json::Value>,
    #[serde(default)]
    pub rewrite_path: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub status: Option<Status>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_path_validation() {
        assert!(NewLocation::new("/v1/chat", 1).validate().is_ok());
        assert!(NewLocation::new("v1/chat", 1).validate().is_err());

        let mut regex = NewLocation::new("^/v1/(chat|completions)$", 1);
        regex.is_regex = true;
        assert!(regex.validate().is_ok());

        regex.path = "([".to_string();
        assert!(regex.validate().is_err());
    }
}
