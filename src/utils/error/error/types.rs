//! Error types for the config center

use thiserror::Error;

/// Result type alias for the config center
pub type Result<T> = std::result::Result<T, ConfigCenterError>;

/// Main error type for the config center
#[derive(Error, Debug)]
pub enum ConfigCenterError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Non-transient relational store errors (constraint violations, bad queries)
    #[error("Database error: {0}")]
    Database(sea_orm::DbErr),

    /// Network or timeout failure talking to the relational store
    #[error("Transient store error: {0}")]
    TransientStore(String),

    /// Redis errors that do not indicate the server is unreachable
    #[error("Redis error: {0}")]
    Redis(redis::RedisError),

    /// The fast store cannot be reached
    #[error("Fast store unavailable: {0}")]
    FastStoreUnavailable(String),

    /// A stored rule configuration payload is malformed
    #[error("Rule {rule_id} has a malformed configuration: {message}")]
    ConfigParse { rule_id: i32, message: String },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors (mutations against a missing id)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
