//! Configuration loading and start-up integration tests

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use crate::common::NamespaceFactory;
    use config_center::{Config, ConfigCenter, EntityType, Lookup, Record, WriteOp};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const IN_MEMORY: &str = r#"
storage:
  database:
    url: "sqlite::memory:"
    max_connections: 1
  redis:
    enabled: false
cache:
  sync_interval: 5
logging:
  level: debug
  format: json
"#;

    #[tokio::test]
    async fn test_init_from_file_without_redis() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(IN_MEMORY.as_bytes()).unwrap();

        let config = assert_ok!(Config::from_file(file.path()).await);
        assert_eq!(config.cache.sync_interval, 5);
        assert!(!config.storage.redis.enabled);

        let center = assert_ok!(ConfigCenter::init(config).await);
        assert_eq!(center.health().await.fast_store_backend, "memory");

        let summary = assert_ok!(
            center
                .write_dual_write(WriteOp::CreateNamespace {
                    data: NamespaceFactory::create("wechat"),
                })
                .await
        );
        let read = assert_ok!(
            center
                .read_through(EntityType::Namespaces, Lookup::Id(summary.id))
                .await
        );
        assert!(matches!(read, Some(Record::Namespace(ns)) if ns.namespace_code == "wechat"));

        center.shutdown().await;
    }

    #[test]
    fn test_zero_sync_interval_is_rejected() {
        let yaml = IN_MEMORY.replace("sync_interval: 5", "sync_interval: 0");
        assert!(Config::from_yaml(&yaml).is_err());
    }

    #[test]
    fn test_defaults_round_trip_through_yaml() {
        let yaml = Config::default().to_yaml().unwrap();
        let config = assert_ok!(Config::from_yaml(&yaml));
        assert_eq!(config.rate_limit.grace_period, 60);
        assert_eq!(config.cache.temp_key_ttl, 60);
        assert_eq!(config.retry.max_attempts, 2);
    }
}
