//! Snapshot sync and health integration tests

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use crate::common::{NamespaceFactory, RuleFactory, TestHarness};
    use config_center::core::cache::keys;
    use config_center::core::models::{NewUpstream, Rule};
    use config_center::storage::ConfigStore;
    use config_center::{CounterKind, EntityType};
    use std::time::Duration;

    #[tokio::test]
    async fn test_sync_fills_keys_written_behind_the_cache() {
        let h = TestHarness::new().await;
        let db = h.db.db();
        let ns = db.create_namespace(&NamespaceFactory::create("wechat")).await.unwrap();
        db.create_rule(&RuleFactory::token_limit(ns.namespace_id, 100)).await.unwrap();
        db.create_upstream(&NewUpstream::new("llm-a", "openai", "http://10.0.0.1:8000"))
            .await
            .unwrap();

        let report = assert_ok!(h.center.sync_once().await);
        assert_eq!(report.namespaces, 1);
        assert_eq!(report.rules, 1);
        assert_eq!(report.upstreams, 1);
        assert_eq!(report.failed_writes, 0);

        assert!(h.cached("config:namespaces:wechat").await.is_some());
        assert!(h.cached(&keys::namespace_key(ns.namespace_id)).await.is_some());
        assert!(h.cached(&keys::list_key(EntityType::Upstreams)).await.is_some());

        let raw = h.cached(&keys::rules_key(ns.namespace_id)).await.unwrap();
        let rules: Vec<Rule> = serde_json::from_str(&raw).unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[tokio::test]
    async fn test_sync_resets_counters_after_missed_invalidation() {
        let h = TestHarness::new().await;
        let ns = h.namespace("wechat").await;
        h.rule(RuleFactory::token_limit(ns.namespace_id, 100)).await;
        assert_ok!(h.center.increment(ns.namespace_id, CounterKind::Token, 30).await);

        // A second writer bypasses the cache
        h.db
            .db()
            .create_rule(&RuleFactory::qps_limit(ns.namespace_id, 5))
            .await
            .unwrap();

        let report = assert_ok!(h.center.sync_once().await);
        assert_eq!(report.changed_namespaces, vec![ns.namespace_id]);
        assert_eq!(
            assert_ok!(h.center.counters().read(ns.namespace_id, CounterKind::Token).await),
            0
        );

        let again = assert_ok!(h.center.sync_once().await);
        assert!(again.changed_namespaces.is_empty());
    }

    #[tokio::test]
    async fn test_sync_loop_lifecycle() {
        let h = TestHarness::new().await;
        h.center.start_sync();
        tokio::time::timeout(Duration::from_secs(5), h.center.shutdown())
            .await
            .expect("shutdown timed out");
    }

    #[tokio::test]
    async fn test_health_and_stats() {
        let h = TestHarness::new().await;
        let health = h.center.health().await;
        assert!(health.database);
        assert!(health.fast_store);
        assert!(health.overall);
        assert_eq!(health.fast_store_backend, "memory");

        h.namespace("wechat").await;
        let stats = assert_ok!(h.center.cache_stats().await);
        assert!(stats.connected);
        assert!(stats.total_keys.unwrap_or_default() > 0);
    }
}
