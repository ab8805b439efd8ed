//! Test fixtures and data factories
//!
//! Provides factory methods for creating test data with sensible defaults.
//! All factories create real objects, not mocks.

use super::database::TestDatabase;
use config_center::core::models::{
    ConcurrentLimit, Namespace, NewNamespace, NewRule, QpsLimit, Rule, RuleConfig, TokenLimit,
};
use config_center::storage::{ConfigStore, FastStore, MemoryStore};
use config_center::utils::ManualClock;
use config_center::{AppContext, ConfigCenter, WriteOp};
use std::sync::Arc;

/// Start of an hour, so token and QPS windows line up
pub const HOUR_START: u64 = 1_700_000_000 / 3600 * 3600;

/// Factory for namespace payloads
pub struct NamespaceFactory;

impl NamespaceFactory {
    /// Payload named after its code
    pub fn create(code: &str) -> NewNamespace {
        let mut name = code.to_string();
        if let Some(first) = name.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        NewNamespace::new(code, name)
    }
}

/// Factory for rule payloads
pub struct RuleFactory;

impl RuleFactory {
    /// Hourly token limit
    pub fn token_limit(namespace_id: i32, max_tokens: u64) -> NewRule {
        NewRule::new(
            Some(namespace_id),
            "token limit",
            RuleConfig::TokenLimit(TokenLimit {
                max_tokens,
                window_seconds: Some(3600),
                model_name: None,
            }),
        )
    }

    /// Per-minute request limit
    pub fn qps_limit(namespace_id: i32, max_requests: u64) -> NewRule {
        NewRule::new(
            Some(namespace_id),
            "qps limit",
            RuleConfig::QpsLimit(QpsLimit {
                max_requests,
                window_seconds: Some(60),
            }),
        )
    }

    pub fn concurrent_limit(namespace_id: i32, max_concurrent: u64) -> NewRule {
        NewRule::new(
            Some(namespace_id),
            "concurrency limit",
            RuleConfig::ConcurrentLimit(ConcurrentLimit { max_concurrent }),
        )
    }
}

/// A config center over an in-memory database and memory fast store
pub struct TestHarness {
    pub center: ConfigCenter,
    pub db: TestDatabase,
    pub fast: Arc<MemoryStore>,
    pub clock: ManualClock,
}

impl TestHarness {
    /// Harness with the clock a little past [`HOUR_START`]
    pub async fn new() -> Self {
        Self::at(HOUR_START + 125).await
    }

    pub async fn at(now: u64) -> Self {
        let db = TestDatabase::new().await;
        let clock = ManualClock::starting_at(now);
        let fast = Arc::new(MemoryStore::new(Arc::new(clock.clone())));
        let ctx = AppContext::with_stores(db.db_arc(), fast.clone()).with_clock(Arc::new(clock.clone()));
        Self {
            center: ConfigCenter::from_context(ctx),
            db,
            fast,
            clock,
        }
    }

    /// Create a namespace through the dual-write path
    pub async fn namespace(&self, code: &str) -> Namespace {
        let summary = self
            .center
            .write_dual_write(WriteOp::CreateNamespace {
                data: NamespaceFactory::create(code),
            })
            .await
            .expect("Failed to create namespace");
        self.db
            .db()
            .get_namespace(summary.id)
            .await
            .expect("Failed to read namespace")
            .expect("Namespace missing after create")
    }

    /// Create a rule through the dual-write path
    pub async fn rule(&self, new: NewRule) -> Rule {
        let summary = self
            .center
            .write_dual_write(WriteOp::CreateRule { data: new })
            .await
            .expect("Failed to create rule");
        self.db
            .db()
            .get_rule(summary.id)
            .await
            .expect("Failed to read rule")
            .expect("Rule missing after create")
    }

    /// Raw fast store value
    pub async fn cached(&self, key: &str) -> Option<String> {
        self.fast.get(key).await.expect("Memory store read failed")
    }
}
