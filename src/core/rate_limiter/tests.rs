//! Tests for rate limiter

#[cfg(test)]
mod tests {
    use super::super::{CounterEngine, TimeWindow, changed, reset_on_change};
    use crate::core::cache::keys;
    use crate::core::context::AppContext;
    use crate::core::models::{
        ConcurrentLimit, CounterKind, MatcherRule, QpsLimit, Rule, RuleConfig, Status, TokenLimit,
    };
    use crate::storage::config_store::MockConfigStore;
    use crate::storage::{FastStore, MemoryStore};
    use crate::utils::ManualClock;
    use chrono::Utc;
    use std::sync::Arc;
    use std::time::Duration;

    /// 2023-11-14T22:00:00Z, an exact hour boundary
    const HOUR_START: u64 = 1_700_000_000 / 3600 * 3600;

    fn setup() -> (AppContext, Arc<MemoryStore>, ManualClock) {
        let clock = ManualClock::starting_at(HOUR_START + 125);
        let fast = Arc::new(MemoryStore::new(Arc::new(clock.clone())));
        let ctx = AppContext::with_stores(Arc::new(MockConfigStore::new()), fast.clone())
            .with_clock(Arc::new(clock.clone()));
        (ctx, fast, clock)
    }

    fn rule(rule_id: i32, config: RuleConfig) -> Rule {
        Rule {
            rule_id,
            namespace_id: Some(1),
            rule_name: format!("rule-{}", rule_id),
            config,
            priority: 100,
            status: Status::Enabled,
            create_time: Utc::now(),
            update_time: Utc::now(),
        }
    }

    fn token_rule(rule_id: i32, max_tokens: u64) -> Rule {
        rule(
            rule_id,
            RuleConfig::TokenLimit(TokenLimit {
                max_tokens,
                window_seconds: None,
                model_name: None,
            }),
        )
    }

    fn qps_rule(rule_id: i32, max_requests: u64) -> Rule {
        rule(
            rule_id,
            RuleConfig::QpsLimit(QpsLimit {
                max_requests,
                window_seconds: None,
            }),
        )
    }

    #[tokio::test]
    async fn test_increment_and_read() {
        let (ctx, _, _) = setup();
        let engine = CounterEngine::new(ctx);

        assert_eq!(engine.read(1, CounterKind::Token).await.unwrap(), 0);
        assert_eq!(engine.increment(1, CounterKind::Token, 120).await.unwrap(), 120);
        assert_eq!(engine.increment(1, CounterKind::Token, 30).await.unwrap(), 150);
        assert_eq!(engine.read(1, CounterKind::Token).await.unwrap(), 150);
        assert_eq!(engine.read(2, CounterKind::Token).await.unwrap(), 0);
        assert_eq!(engine.read(1, CounterKind::Qps).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_counter_key_and_ttl() {
        let (ctx, fast, _) = setup();
        let engine = CounterEngine::new(ctx);

        engine.increment(1, CounterKind::Token, 1).await.unwrap();
        let key = keys::counter_key(1, CounterKind::Token, HOUR_START);
        assert_eq!(fast.get(&key).await.unwrap().as_deref(), Some("1"));
        // window end + 60s grace, measured from 125s into the window
        assert_eq!(fast.ttl(&key), Some(3600 + 60 - 125));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_lose_nothing() {
        let (ctx, _, _) = setup();
        let engine = CounterEngine::new(ctx);

        let handles: Vec<_> = (0..200)
            .map(|_| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.increment(7, CounterKind::Qps, 1).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(engine.read(7, CounterKind::Qps).await.unwrap(), 200);
    }

    #[tokio::test]
    async fn test_read_after_ttl_returns_zero() {
        let (ctx, _, clock) = setup();
        let engine = CounterEngine::new(ctx);

        engine.increment(1, CounterKind::Qps, 5).await.unwrap();
        clock.advance(Duration::from_secs(60));
        assert_eq!(engine.read(1, CounterKind::Qps).await.unwrap(), 0);

        let start = HOUR_START + 120;
        assert_eq!(engine.read_window(1, CounterKind::Qps, start).await.unwrap(), 5);

        clock.advance(Duration::from_secs(3600));
        assert_eq!(engine.read_window(1, CounterKind::Qps, start).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_new_window_starts_at_zero() {
        let (ctx, _, clock) = setup();
        let engine = CounterEngine::new(ctx);

        engine.increment(1, CounterKind::Token, 500).await.unwrap();
        clock.advance(Duration::from_secs(3600));
        assert_eq!(engine.read(1, CounterKind::Token).await.unwrap(), 0);
        assert_eq!(engine.increment(1, CounterKind::Token, 1).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_gauge_floors_at_zero() {
        let (ctx, _, _) = setup();
        let engine = CounterEngine::new(ctx);

        assert_eq!(engine.acquire_concurrent(3).await.unwrap(), 1);
        assert_eq!(engine.acquire_concurrent(3).await.unwrap(), 2);
        assert_eq!(engine.release_concurrent(3).await.unwrap(), 1);
        assert_eq!(engine.release_concurrent(3).await.unwrap(), 0);
        assert_eq!(engine.release_concurrent(3).await.unwrap(), 0);
        assert_eq!(engine.read(3, CounterKind::Concurrent).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_check_inclusive_boundary() {
        let (ctx, _, _) = setup();
        let engine = CounterEngine::new(ctx);

        engine.increment(1, CounterKind::Qps, 10).await.unwrap();
        let decision = engine.check(1, CounterKind::Qps, 10).await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 0);
        assert_eq!(decision.retry_after_secs(), None);

        engine.increment(1, CounterKind::Qps, 1).await.unwrap();
        let decision = engine.check(1, CounterKind::Qps, 10).await.unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.current, 11);
        // 125s into the hour is 5s into the minute window
        assert_eq!(decision.retry_after_secs(), Some(55));
    }

    #[tokio::test]
    async fn test_check_zero_limit_is_unlimited() {
        let (ctx, _, _) = setup();
        let engine = CounterEngine::new(ctx);

        engine.increment(1, CounterKind::Token, 1_000_000).await.unwrap();
        let decision = engine.check(1, CounterKind::Token, 0).await.unwrap();
        assert!(decision.allowed);
    }

    #[test]
    fn test_changed_ignores_name_and_timestamps() {
        let old = vec![token_rule(1, 100), qps_rule(2, 10)];
        let mut new = old.clone();
        new[0].rule_name = "renamed".to_string();
        new[1].update_time = Utc::now() + chrono::Duration::hours(1);
        assert!(!changed(&old, &new));
    }

    #[test]
    fn test_changed_is_structural() {
        let old = vec![token_rule(1, 100)];
        let json = serde_json::to_string(&old).unwrap();
        let decoded: Vec<Rule> = serde_json::from_str(&json).unwrap();
        assert!(!changed(&old, &decoded));

        let reordered = RuleConfig::from_parts(
            "token_limit",
            r#"{ "window_seconds": null,   "max_tokens": 100 }"#,
        )
        .unwrap();
        let mut new = old.clone();
        new[0].config = reordered;
        assert!(!changed(&old, &new));
    }

    #[test]
    fn test_changed_detects_semantic_changes() {
        let old = vec![token_rule(1, 100)];

        assert!(changed(&old, &[token_rule(1, 200)]));
        assert!(changed(&old, &[token_rule(2, 100)]));
        assert!(changed(&old, &[token_rule(1, 100), qps_rule(2, 5)]));
        assert!(changed(&old, &[]));

        let mut reprioritised = old.clone();
        reprioritised[0].priority = 1;
        assert!(changed(&old, &reprioritised));

        let mut disabled = old.clone();
        disabled[0].status = Status::Disabled;
        assert!(changed(&old, &disabled));
    }

    #[test]
    fn test_changed_empty_sets() {
        assert!(!changed(&[], &[]));
    }

    #[tokio::test]
    async fn test_reset_zeroes_current_window_and_removes_stale() {
        let (ctx, fast, _) = setup();
        let engine = CounterEngine::new(ctx.clone());

        engine.increment(1, CounterKind::Token, 7).await.unwrap();
        let stale = keys::counter_key(1, CounterKind::Token, HOUR_START - 3600);
        fast.set(&stale, "42", Some(600)).await.unwrap();
        let other_namespace = keys::counter_key(2, CounterKind::Token, HOUR_START);
        fast.set(&other_namespace, "9", Some(600)).await.unwrap();

        let report = reset_on_change(&ctx, 1, &[token_rule(1, 20)]).await.unwrap();

        assert_eq!(engine.read(1, CounterKind::Token).await.unwrap(), 0);
        assert_eq!(report.reset_keys, vec![keys::counter_key(1, CounterKind::Token, HOUR_START)]);
        assert_eq!(report.removed_keys, 1);
        assert_eq!(fast.get(&stale).await.unwrap(), None);
        assert_eq!(fast.get(&other_namespace).await.unwrap().as_deref(), Some("9"));
    }

    #[tokio::test]
    async fn test_reset_skips_kinds_without_rules() {
        let (ctx, _, _) = setup();
        let engine = CounterEngine::new(ctx.clone());

        engine.increment(1, CounterKind::Qps, 3).await.unwrap();
        engine.acquire_concurrent(1).await.unwrap();
        let matcher = rule(
            5,
            RuleConfig::Matcher(MatcherRule {
                matcher_type: "header".to_string(),
                match_field: "channelcode".to_string(),
                match_operator: "equals".to_string(),
                match_value: "wechat".to_string(),
            }),
        );

        let report = reset_on_change(&ctx, 1, &[token_rule(1, 10), matcher]).await.unwrap();

        assert_eq!(report.reset_keys.len(), 1);
        assert_eq!(engine.read(1, CounterKind::Qps).await.unwrap(), 3);
        assert_eq!(engine.read(1, CounterKind::Concurrent).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reset_concurrent_gauge() {
        let (ctx, _, _) = setup();
        let engine = CounterEngine::new(ctx.clone());

        engine.acquire_concurrent(1).await.unwrap();
        engine.acquire_concurrent(1).await.unwrap();
        let limit = rule(3, RuleConfig::ConcurrentLimit(ConcurrentLimit { max_concurrent: 5 }));

        reset_on_change(&ctx, 1, &[limit]).await.unwrap();
        assert_eq!(engine.read(1, CounterKind::Concurrent).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reset_keeps_every_live_window_of_a_kind() {
        let (ctx, fast, _) = setup();
        let hourly = token_rule(1, 100);
        let mut daily = token_rule(2, 1000);
        daily.config = RuleConfig::TokenLimit(TokenLimit {
            max_tokens: 1000,
            window_seconds: Some(86_400),
            model_name: None,
        });

        let report = reset_on_change(&ctx, 1, &[hourly, daily]).await.unwrap();
        assert_eq!(report.reset_keys.len(), 2);
        for key in &report.reset_keys {
            assert_eq!(fast.get(key).await.unwrap().as_deref(), Some("0"));
        }
    }

    #[test]
    fn test_default_usage_window() {
        assert_eq!(TimeWindow::default().seconds, 1800);
    }
}
