//! Enabled / disabled flag

use serde::{Deserialize, Serialize};
use std::fmt;

/// Record status, encoded as `1` (enabled) or `0` (disabled)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Status {
    #[default]
    Enabled,
    Disabled,
}

impl Status {
    /// Integer form stored in the relational store
    pub fn as_i32(self) -> i32 {
        match self {
            Status::Enabled => 1,
            Status::Disabled => 0,
        }
    }

    pub fn is_enabled(self) -> bool {
        matches!(self, Status::Enabled)
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.as_i32()
    }
}

impl TryFrom<i32> for Status {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Status::Enabled),
            0 => Ok(Status::Disabled),
            other => Err(format!("invalid status {}, expected 0 or 1", other)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Enabled => write!(f, "enabled"),
            Status::Disabled => write!(f, "disabled"),
        }
    }
}
