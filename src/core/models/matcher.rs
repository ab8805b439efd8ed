//! Message matchers
//!
//! A matcher decides which namespace an inbound request belongs to, e.g.
//! header `channelcode` equals `wechat`.

use super::{Status, Timestamp};
use crate::utils::error::{ConfigCenterError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matcher {
    pub matcher_id: i32,
    pub namespace_id: i32,
    pub matcher_name: String,
    /// `header` or `body`
    pub matcher_type: String,
    pub match_field: String,
    pub match_operator: String,
    pub match_value: String,
    pub priority: i32,
    pub status: Status,
    pub create_time: Timestamp,
    pub update_time: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMatcher {
    pub namespace_id: i32,
    pub matcher_name: String,
    pub matcher_type: String,
    pub match_field: String,
    pub match_operator: String,
    pub match_value: String,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default)]
    pub status: Status,
}

fn default_priority() -> i32 {
    100
}

impl NewMatcher {
    pub fn validate(&self) -> Result<()> {
        if self.matcher_name.trim().is_empty() {
            return Err(ConfigCenterError::validation("matcher_name cannot be empty"));
        }
        if self.match_field.trim().is_empty() {
            return Err(ConfigCenterError::validation("match_field cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatcherPatch {
    #[serde(default)]
    pub matcher_name: Option<String>,
    #[serde(default)]
    pub matcher_type: Option<String>,
    #[serde(default)]
    pub match_field: Option<String>,
    #[serde(default)]
    pub match_operator: Option<String>,
    #[serde(default)]
    pub match_value: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub status: Option<Status>,
}
