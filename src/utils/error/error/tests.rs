//! Tests for error handling

#[cfg(test)]
mod tests {
    use super::super::types::ConfigCenterError;
    use sea_orm::{DbErr, RuntimeErr};

    // ==================== Helper Function Tests ====================

    #[test]
    fn test_validation_helper() {
        let error = ConfigCenterError::validation("namespace code is empty");
        assert!(matches!(error, ConfigCenterError::Validation(msg) if msg == "namespace code is empty"));
    }

    #[test]
    fn test_not_found_helper() {
        let error = ConfigCenterError::not_found("namespace 7");
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Not found: namespace 7");
    }

    #[test]
    fn test_config_parse_display() {
        let error = ConfigCenterError::config_parse(12, "missing field `max_tokens`");
        assert_eq!(
            error.to_string(),
            "Rule 12 has a malformed configuration: missing field `max_tokens`"
        );
    }

    // ==================== Classification Tests ====================

    #[test]
    fn test_transient_classification() {
        assert!(ConfigCenterError::TransientStore("reset".into()).is_transient());
        assert!(ConfigCenterError::fast_store_unavailable("refused").is_transient());
        assert!(ConfigCenterError::timeout("slow").is_transient());

        assert!(!ConfigCenterError::validation("bad").is_transient());
        assert!(!ConfigCenterError::not_found("gone").is_transient());
    }

    #[test]
    fn test_db_connection_error_is_transient() {
        let err: ConfigCenterError =
            DbErr::Conn(RuntimeErr::Internal("connection reset by peer".into())).into();
        assert!(err.is_transient());
        assert!(matches!(err, ConfigCenterError::TransientStore(_)));
    }

    #[test]
    fn test_db_query_error_is_permanent() {
        let err: ConfigCenterError =
            DbErr::Query(RuntimeErr::Internal("UNIQUE constraint failed".into())).into();
        assert!(!err.is_transient());
        assert!(matches!(err, ConfigCenterError::Database(_)));
    }

    #[test]
    fn test_db_statement_losing_its_connection_is_transient() {
        use sea_orm::sqlx::Error as SqlxError;

        let reset = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset by peer");
        let cases = [
            DbErr::Query(RuntimeErr::SqlxError(SqlxError::Io(reset))),
            DbErr::Exec(RuntimeErr::SqlxError(SqlxError::PoolTimedOut)),
            DbErr::Query(RuntimeErr::SqlxError(SqlxError::PoolClosed)),
        ];
        for db_err in cases {
            let err: ConfigCenterError = db_err.into();
            assert!(err.is_transient(), "{} should be transient", err);
            assert!(matches!(err, ConfigCenterError::TransientStore(_)));
        }

        let err: ConfigCenterError = DbErr::Query(RuntimeErr::SqlxError(SqlxError::RowNotFound)).into();
        assert!(!err.is_transient());
    }

    #[test]
    fn test_db_record_not_found_maps_to_not_found() {
        let err: ConfigCenterError = DbErr::RecordNotFound("rule 3".into()).into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_redis_io_error_is_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: ConfigCenterError = redis::RedisError::from(io).into();
        assert!(err.is_fast_store_unavailable());
    }

    #[test]
    fn test_redis_type_error_is_not_unavailable() {
        let redis_err = redis::RedisError::from((redis::ErrorKind::TypeError, "not an integer"));
        let err: ConfigCenterError = redis_err.into();
        assert!(!err.is_fast_store_unavailable());
        assert!(matches!(err, ConfigCenterError::Redis(_)));
    }
}
