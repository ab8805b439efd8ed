//! Type conversions for ConfigCenterError
//!
//! Store errors are classified on the way in so callers can tell a transient
//! failure apart from a permanent one without inspecting driver types.

use super::types::ConfigCenterError;
use sea_orm::{DbErr, RuntimeErr};

impl From<DbErr> for ConfigCenterError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::ConnectionAcquire(e) => {
                ConfigCenterError::TransientStore(format!("Connection acquire failed: {}", e))
            }
            DbErr::Conn(e) => ConfigCenterError::TransientStore(format!("Connection error: {}", e)),
            DbErr::Query(ref e) | DbErr::Exec(ref e) if is_transient_runtime(e) => {
                ConfigCenterError::TransientStore(format!("Connection lost mid-statement: {}", e))
            }
            DbErr::RecordNotFound(what) => ConfigCenterError::NotFound(what),
            other => ConfigCenterError::Database(other),
        }
    }
}

/// A statement that failed because the connection or pool did, not because
/// of the statement itself
#[cfg(any(feature = "sqlite", feature = "postgres"))]
fn is_transient_runtime(err: &RuntimeErr) -> bool {
    use sea_orm::sqlx::Error as SqlxError;

    matches!(
        err,
        RuntimeErr::SqlxError(
            SqlxError::Io(_) | SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::WorkerCrashed
        )
    )
}

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
fn is_transient_runtime(_err: &RuntimeErr) -> bool {
    false
}

impl From<redis::RedisError> for ConfigCenterError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_refusal()
            || err.is_connection_dropped()
            || err.is_timeout()
        {
            ConfigCenterError::FastStoreUnavailable(err.to_string())
        } else {
            ConfigCenterError::Redis(err)
        }
    }
}
