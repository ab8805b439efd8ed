//! Upstream servers the data plane proxies to

use super::{Status, Timestamp};
use crate::utils::error::{ConfigCenterError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upstream {
    pub server_id: i32,
    pub server_name: String,
    /// e.g. `openai`, `azure`, `custom`
    pub server_type: String,
    pub server_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model_config: Option<serde_json::Value>,
    pub load_balance_weight: i32,
    pub max_connections: i32,
    pub timeout_connect: i32,
    pub timeout_read: i32,
    pub timeout_write: i32,
    #[serde(default)]
    pub health_check_url: Option<String>,
    pub health_check_interval: i32,
    pub status: Status,
    pub create_time: Timestamp,
    pub update_time: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUpstream {
    pub server_name: String,
    pub server_type: String,
    pub server_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model_config: Option<serde_json::Value>,
    #[serde(default = "default_weight")]
    pub load_balance_weight: i32,
    #[serde(default = "default_max_connections")]
    pub max_connections: i32,
    #[serde(default = "default_connect_timeout")]
    pub timeout_connect: i32,
    #[serde(default = "default_io_timeout")]
    pub timeout_read: i32,
    #[serde(default = "default_io_timeout")]
    pub timeout_write: i32,
    #[serde(default)]
    pub health_check_url: Option<String>,
    #[serde(default = "default_health_check_interval")]
    pub health_check_interval: i32,
    #[serde(default)]
    pub status: Status,
}

fn default_weight() -> i32 {
    1
}

fn default_max_connections() -> i32 {
    100
}

fn default_connect_timeout() -> i32 {
    30
}

fn default_io_timeout() -> i32 {
    300
}

fn default_health_check_interval() -> i32 {
    30
}

impl NewUpstream {
    /// Payload with default weights and timeouts
    pub fn new(name: impl Into<String>, server_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            server_name: name.into(),
            server_type: server_type.into(),
            server_url: url.into(),
            api_key: None,
            model_config: None,
            load_balance_weight: default_weight(),
            max_connections: default_max_connections(),
            timeout_connect: default_connect_timeout(),
            timeout_read: default_io_timeout(),
            timeout_write: default_io_timeout(),
            health_check_url: None,
            health_check_interval: default_health_check_interval(),
            status: Status::Enabled,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_name.trim().is_empty() {
            return Err(ConfigCenterError::validation("server_name cannot be empty"));
        }
        url::Url::parse(&self.server_url)
            .map_err(|e| ConfigCenterError::validation(format!("invalid server_url: {}", e)))?;
        if self.load_balance_weight < 0 || self.max_connections < 0 {
            return Err(ConfigCenterError::validation(
                "load_balance_weight and max_connections cannot be negative",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpstreamPatch {
    #[serde(default)]
    pub server_name: Option<String>,
    #[serde(default)]
    pub server_type: Option<String>,
    #[serde(default)]
    pub server_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model_config: Option<serde_json::Value>,
    #[serde(default)]
    pub load_balance_weight: Option<i32>,
    #[serde(default)]
    pub max_connections: Option<i32>,
    #[serde(default)]
    pub timeout_connect: Option<i32>,
    #[serde(default)]
    pub timeout_read: Option<i32>,
    #[serde(default)]
    pub timeout_write: Option<i32>,
    #[serde(default)]
    pub health_check_url: Option<String>,
    #[serde(default)]
    pub health_check_interval: Option<i32>,
    #[serde(default)]
    pub status: Option<Status>,
}

impl UpstreamPatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.server_url {
            url::Url::parse(url)
                .map_err(|e| ConfigCenterError::validation(format!("invalid server_url: {}", e)))?;
        }
        Ok(())
    }
}
