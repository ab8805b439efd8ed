//! SeaORM store tests against in-memory SQLite

use super::types::SeaOrmDatabase;
use crate::config::DatabaseConfig;
use crate::core::models::*;
use crate::utils::error::ConfigCenterError;
use sea_orm::{ActiveModelTrait, Set};

async fn memory_db() -> SeaOrmDatabase {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        connection_timeout: 5,
        run_migrations: true,
    };
    SeaOrmDatabase::new(&config).await.unwrap()
}

fn token_limit(max_tokens: u64) -> RuleConfig {
    RuleConfig::TokenLimit(TokenLimit {
        max_tokens,
        window_seconds: None,
        model_name: None,
    })
}

#[tokio::test]
async fn test_namespace_crud() {
    let db = memory_db().await;

    let created = db.create_namespace(&NewNamespace::new("wechat", "WeChat")).await.unwrap();
    assert_eq!(created.namespace_id, 1);
    assert_eq!(created.status, Status::Enabled);

    let by_code = db.get_namespace_by_code("wechat").await.unwrap().unwrap();
    assert_eq!(by_code, created);

    let patch = NamespacePatch {
        status: Some(Status::Disabled),
        ..Default::default()
    };
    let updated = db.update_namespace(1, &patch).await.unwrap().unwrap();
    assert_eq!(updated.status, Status::Disabled);
    assert_eq!(updated.namespace_code, "wechat");

    assert!(db.list_namespaces(Some(Status::Enabled)).await.unwrap().is_empty());
    assert_eq!(db.list_namespaces(None).await.unwrap().len(), 1);

    assert!(db.update_namespace(99, &patch).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_namespace_code_conflicts() {
    let db = memory_db().await;
    db.create_namespace(&NewNamespace::new("wechat", "WeChat")).await.unwrap();
    let err = db.create_namespace(&NewNamespace::new("wechat", "Again")).await.unwrap_err();
    assert!(matches!(err, ConfigCenterError::Conflict(_)));
}

#[tokio::test]
async fn test_delete_namespace_cascades() {
    let db = memory_db().await;
    let ns = db.create_namespace(&NewNamespace::new("wechat", "WeChat")).await.unwrap();
    db.create_rule(&NewRule::new(Some(ns.namespace_id), "tokens", token_limit(10)))
        .await
        .unwrap();
    db.create_matcher(&NewMatcher {
        namespace_id: ns.namespace_id,
        matcher_name: "channel".to_string(),
        matcher_type: "header".to_string(),
        match_field: "channelcode".to_string(),
        match_operator: "equals".to_string(),
        match_value: "wechat".to_string(),
        priority: 100,
        status: Status::Enabled,
    })
    .await
    .unwrap();

    let deleted = db.delete_namespace(ns.namespace_id).await.unwrap();
    assert_eq!(deleted.map(|n| n.namespace_id), Some(ns.namespace_id));
    assert!(db.list_rules(Some(ns.namespace_id), None).await.unwrap().is_empty());
    assert!(db.list_matchers(Some(ns.namespace_id), None).await.unwrap().is_empty());
    assert!(db.delete_namespace(ns.namespace_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_rules_ordered_and_malformed_skipped() {
    let db = memory_db().await;
    let mut low = NewRule::new(Some(1), "low", token_limit(10));
    low.priority = 200;
    let high = NewRule::new(Some(1), "high", token_limit(20));
    db.create_rule(&low).await.unwrap();
    db.create_rule(&high).await.unwrap();

    // A row written by something other than this crate
    let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
    let broken = super::super::entities::rule::ActiveModel {
        namespace_id: Set(Some(1)),
        rule_name: Set("broken".to_string()),
        rule_type: Set("token_limit".to_string()),
        rule_config: Set("{oops".to_string()),
        priority: Set(1),
        status: Set(1),
        create_time: Set(now),
        update_time: Set(now),
        ..Default::default()
    }
    .insert(db.connection())
    .await
    .unwrap();

    let rules = db.list_rules(Some(1), None).await.unwrap();
    let names: Vec<&str> = rules.iter().map(|r| r.rule_name.as_str()).collect();
    assert_eq!(names, vec!["high", "low"]);

    let err = db.get_rule(broken.rule_id).await.unwrap_err();
    assert!(matches!(err, ConfigCenterError::ConfigParse { rule_id, .. } if rule_id == broken.rule_id));
    assert_eq!(db.rule_namespace(broken.rule_id).await.unwrap(), Some(Some(1)));
}

#[tokio::test]
async fn test_update_rule_config() {
    let db = memory_db().await;
    let rule = db.create_rule(&NewRule::new(None, "global", token_limit(10))).await.unwrap();
    assert_eq!(rule.namespace_id, None);

    let patch = RulePatch {
        config: Some(RuleConfig::QpsLimit(QpsLimit {
            max_requests: 5,
            window_seconds: Some(1),
        })),
        ..Default::default()
    };
    let updated = db.update_rule(rule.rule_id, &patch).await.unwrap().unwrap();
    assert_eq!(updated.kind(), RuleKind::QpsLimit);
    assert_eq!(updated.rule_name, "global");

    assert!(db.delete_rule(rule.rule_id).await.unwrap());
    assert!(!db.delete_rule(rule.rule_id).await.unwrap());
}

#[tokio::test]
async fn test_upstream_and_location_crud() {
    let db = memory_db().await;
    let mut new = NewUpstream::new("gpt", "openai", "https://api.openai.com");
    new.model_config = Some(serde_json::json!({"models": ["gpt-4o"]}));
    let upstream = db.create_upstream(&new).await.unwrap();
    assert_eq!(upstream.model_config, new.model_config);

    let location = db
        .create_location(&NewLocation::new("/v1/chat", upstream.server_id))
        .await
        .unwrap();
    assert_eq!(location.matcher_type, "path");

    let patch = LocationPatch {
        sse_support: Some(true),
        ..Default::default()
    };
    let updated = db.update_location(location.location_id, &patch).await.unwrap().unwrap();
    assert!(updated.sse_support);

    assert_eq!(db.list_upstreams(Some(Status::Enabled)).await.unwrap().len(), 1);
    assert!(db.delete_location(location.location_id).await.unwrap().is_some());
    assert!(db.list_locations(None).await.unwrap().is_empty());
}
