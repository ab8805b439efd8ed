//! Read-through and dual-write integration tests

#[cfg(test)]
mod tests {
    use crate::common::{FailingStore, NamespaceFactory, RuleFactory, TestDatabase, TestHarness};
    use crate::{assert_err, assert_ok};
    use config_center::core::cache::keys;
    use config_center::core::models::{NamespacePatch, NewLocation, NewUpstream, Status};
    use config_center::storage::ConfigStore;
    use config_center::{AppContext, ConfigCenter, ConfigCenterError, EntityType, Lookup, Record, WriteOp};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_read_after_write() {
        let h = TestHarness::new().await;
        let ns = h.namespace("wechat").await;

        let read = assert_ok!(
            h.center
                .read_through(EntityType::Namespaces, Lookup::Id(ns.namespace_id))
                .await
        );
        assert_eq!(read, Some(Record::Namespace(ns.clone())));
        assert!(h.cached(&keys::namespace_key(ns.namespace_id)).await.is_some());

        let by_code = assert_ok!(
            h.center
                .read_through(EntityType::Namespaces, Lookup::Code("wechat".to_string()))
                .await
        );
        match by_code {
            Some(Record::Snapshot(snapshot)) => {
                assert_eq!(snapshot.namespace, ns);
                assert_eq!(snapshot.matcher.map(|m| m.match_value), Some("wechat".to_string()));
            }
            other => panic!("Expected a namespace snapshot, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cache_keys_follow_the_wire_layout() {
        let h = TestHarness::new().await;
        let ns = h.namespace("wechat").await;

        let raw = h
            .cached(&format!("config:namespaces:{}", ns.namespace_id))
            .await
            .expect("namespace key missing");
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["namespace_code"], "wechat");
        assert_eq!(json["status"], 1);

        assert!(h.cached("config:namespaces:wechat").await.is_some());
        assert!(h.cached("config:namespaces:list").await.is_none());
    }

    #[tokio::test]
    async fn test_reads_survive_unreachable_fast_store() {
        let db = TestDatabase::new().await;
        let ns = db
            .db()
            .create_namespace(&NamespaceFactory::create("wechat"))
            .await
            .unwrap();
        let fast = Arc::new(FailingStore::new());
        let center = ConfigCenter::from_context(AppContext::with_stores(db.db_arc(), fast.clone()));

        let read = assert_ok!(
            center
                .read_through(EntityType::Namespaces, Lookup::Id(ns.namespace_id))
                .await
        );
        assert_eq!(read, Some(Record::Namespace(ns)));
        assert!(fast.calls() > 0);

        center.shutdown().await;
    }

    #[tokio::test]
    async fn test_writes_survive_unreachable_fast_store() {
        let db = TestDatabase::new().await;
        let center = ConfigCenter::from_context(AppContext::with_stores(
            db.db_arc(),
            Arc::new(FailingStore::new()),
        ));

        let summary = assert_ok!(
            center
                .write_dual_write(WriteOp::CreateNamespace {
                    data: NamespaceFactory::create("wechat"),
                })
                .await
        );
        assert!(summary.cache_pending);

        let stored = db.db().get_namespace(summary.id).await.unwrap().unwrap();
        assert_eq!(stored.namespace_code, "wechat");
        assert_eq!(stored.status, Status::Enabled);
    }

    #[tokio::test]
    async fn test_absent_record_is_none_and_update_is_not_found() {
        let h = TestHarness::new().await;

        let read = assert_ok!(
            h.center
                .read_through(EntityType::Namespaces, Lookup::Id(404))
                .await
        );
        assert!(read.is_none());
        assert!(h.cached(&keys::namespace_key(404)).await.is_none());

        let err = assert_err!(
            h.center
                .write_dual_write(WriteOp::UpdateNamespace {
                    id: 404,
                    data: NamespacePatch {
                        namespace_name: Some("Gone".to_string()),
                        ..Default::default()
                    },
                })
                .await
        );
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_invalid_payload_touches_nothing() {
        let h = TestHarness::new().await;
        let err = assert_err!(
            h.center
                .write_dual_write(WriteOp::CreateNamespace {
                    data: NamespaceFactory::create("12345"),
                })
                .await
        );
        assert!(matches!(err, ConfigCenterError::Validation(_)));
        assert!(h.fast.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_namespace_leaves_the_list() {
        let h = TestHarness::new().await;
        let wechat = h.namespace("wechat").await;
        h.namespace("alipay").await;

        let listed = assert_ok!(h.center.read_through(EntityType::Namespaces, Lookup::List).await);
        assert!(matches!(listed, Some(Record::Snapshots(ref s)) if s.len() == 2));
        h.center.context().tasks.drain().await;

        assert_ok!(
            h.center
                .write_dual_write(WriteOp::UpdateNamespace {
                    id: wechat.namespace_id,
                    data: NamespacePatch {
                        status: Some(Status::Disabled),
                        ..Default::default()
                    },
                })
                .await
        );

        let listed = assert_ok!(h.center.read_through(EntityType::Namespaces, Lookup::List).await);
        match listed {
            Some(Record::Snapshots(snapshots)) => {
                assert_eq!(snapshots.len(), 1);
                assert_eq!(snapshots[0].namespace.namespace_code, "alipay");
            }
            other => panic!("Expected namespace snapshots, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_batch_dual_write() {
        let h = TestHarness::new().await;
        let ns = h.namespace("wechat").await;

        let report = h
            .center
            .batch_dual_write(vec![
                WriteOp::CreateRule {
                    data: RuleFactory::qps_limit(ns.namespace_id, 100),
                },
                WriteOp::CreateUpstream {
                    data: NewUpstream::new("llm-a", "openai", "http://10.0.0.1:8000"),
                },
                WriteOp::DeleteLocation { id: 77 },
                WriteOp::CreateLocation {
                    data: NewLocation::new("/v1/chat", 1),
                },
            ])
            .await;

        assert_eq!(report.succeeded.len(), 3);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].index, 2);
        assert_eq!(report.failed[0].op, "delete_location");

        let rules = assert_ok!(
            h.center
                .read_through(EntityType::Rules, Lookup::Id(ns.namespace_id))
                .await
        );
        assert!(matches!(rules, Some(Record::Rules(ref r)) if r.len() == 1));
    }
}
