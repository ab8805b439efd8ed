//! Helper functions for creating and classifying errors

use super::types::ConfigCenterError;

/// Helper functions for creating specific errors
impl ConfigCenterError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn fast_store_unavailable<S: Into<String>>(message: S) -> Self {
        Self::FastStoreUnavailable(message.into())
    }

    pub fn config_parse<S: Into<String>>(rule_id: i32, message: S) -> Self {
        Self::ConfigParse {
            rule_id,
            message: message.into(),
        }
    }
}

impl ConfigCenterError {
    /// Whether a retry has a reasonable chance of succeeding
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::TransientStore(_) | Self::FastStoreUnavailable(_) | Self::Timeout(_)
        )
    }

    /// Whether the error came from an unreachable fast store
    pub fn is_fast_store_unavailable(&self) -> bool {
        matches!(self, Self::FastStoreUnavailable(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
