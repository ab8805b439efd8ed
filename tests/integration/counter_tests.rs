//! Counter, usage and reset integration tests

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use crate::common::{HOUR_START, RuleFactory, TestHarness};
    use config_center::core::cache::keys;
    use config_center::core::models::{NewRule, QpsLimit, RuleConfig, RulePatch, TokenLimit};
    use config_center::{CounterKind, Sample, WriteOp};
    use futures::TryStreamExt;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_token_usage_over_limit() {
        let h = TestHarness::new().await;
        let wechat = h.namespace("wechat").await;
        h.rule(RuleFactory::token_limit(wechat.namespace_id, 100_000)).await;

        for _ in 0..100 {
            assert_ok!(h.center.increment(wechat.namespace_id, CounterKind::Token, 1000).await);
        }
        assert_ok!(h.center.increment(wechat.namespace_id, CounterKind::Token, 1).await);

        let usage = assert_ok!(
            h.center
                .get_counter_usage(wechat.namespace_id, CounterKind::Token, None)
                .await
        );
        assert_eq!(usage.current, 100_001);
        assert_eq!(usage.max, 100_000);
        assert!(usage.percent > 100.0);
        assert_eq!(usage.remaining, 0);
        assert_eq!(usage.window_start, Some(HOUR_START));
        assert_eq!(usage.window_end, Some(HOUR_START + 3600));

        let decision = assert_ok!(
            h.center
                .check(wechat.namespace_id, CounterKind::Token, 100_000)
                .await
        );
        assert!(!decision.allowed);
    }

    #[tokio::test]
    async fn test_counter_key_layout() {
        let h = TestHarness::new().await;
        assert_ok!(h.center.increment(1, CounterKind::Token, 5).await);
        assert_ok!(h.center.increment(1, CounterKind::Qps, 1).await);
        assert_ok!(h.center.increment(1, CounterKind::Concurrent, 2).await);

        let token = format!("rate_limit:1:token:{}", HOUR_START);
        let qps = format!("rate_limit:1:qps:{}", HOUR_START + 120);
        assert_eq!(h.cached(&token).await.as_deref(), Some("5"));
        assert_eq!(h.cached(&qps).await.as_deref(), Some("1"));
        assert_eq!(h.cached("concurrent:1:current").await.as_deref(), Some("2"));
        assert_eq!(keys::concurrent_key(1), "concurrent:1:current");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let h = Arc::new(TestHarness::new().await);
        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let h = h.clone();
                tokio::spawn(async move { h.center.increment(9, CounterKind::Qps, 1).await })
            })
            .collect();
        for task in futures::future::join_all(tasks).await {
            assert_ok!(task.unwrap());
        }

        assert_eq!(assert_ok!(h.center.counters().read(9, CounterKind::Qps).await), 50);
    }

    #[tokio::test]
    async fn test_counter_reads_zero_after_ttl() {
        let h = TestHarness::new().await;
        assert_ok!(h.center.increment(1, CounterKind::Token, 40).await);

        // past the window end and the grace period
        h.clock.advance(Duration::from_secs(3600 + 60));
        assert_eq!(assert_ok!(h.center.counters().read(1, CounterKind::Token).await), 0);
        assert_eq!(
            assert_ok!(
                h.center
                    .counters()
                    .read_window(1, CounterKind::Token, HOUR_START)
                    .await
            ),
            0
        );
    }

    #[tokio::test]
    async fn test_zero_limit_reports_zero_percent() {
        let h = TestHarness::new().await;
        let ns = h.namespace("wechat").await;
        h.rule(RuleFactory::qps_limit(ns.namespace_id, 0)).await;
        assert_ok!(h.center.increment(ns.namespace_id, CounterKind::Qps, 12).await);

        let usage = assert_ok!(
            h.center
                .get_counter_usage(ns.namespace_id, CounterKind::Qps, None)
                .await
        );
        assert_eq!(usage.current, 12);
        assert_eq!(usage.max, 0);
        assert_eq!(usage.percent, 0.0);
    }

    #[tokio::test]
    async fn test_rule_update_resets_counter() {
        let h = TestHarness::new().await;
        let wechat = h.namespace("wechat").await;
        let rule = h.rule(RuleFactory::qps_limit(wechat.namespace_id, 10)).await;

        assert_ok!(h.center.increment(wechat.namespace_id, CounterKind::Qps, 7).await);
        assert_eq!(
            assert_ok!(h.center.counters().read(wechat.namespace_id, CounterKind::Qps).await),
            7
        );

        assert_ok!(
            h.center
                .write_dual_write(WriteOp::UpdateRule {
                    id: rule.rule_id,
                    data: RulePatch {
                        config: Some(RuleConfig::QpsLimit(QpsLimit {
                            max_requests: 20,
                            window_seconds: Some(60),
                        })),
                        ..Default::default()
                    },
                })
                .await
        );

        assert_eq!(
            assert_ok!(h.center.counters().read(wechat.namespace_id, CounterKind::Qps).await),
            0
        );
    }

    #[tokio::test]
    async fn test_rename_keeps_counter() {
        let h = TestHarness::new().await;
        let wechat = h.namespace("wechat").await;
        let rule = h.rule(RuleFactory::token_limit(wechat.namespace_id, 500)).await;
        assert_ok!(h.center.increment(wechat.namespace_id, CounterKind::Token, 7).await);

        assert_ok!(
            h.center
                .write_dual_write(WriteOp::UpdateRule {
                    id: rule.rule_id,
                    data: RulePatch {
                        rule_name: Some("renamed".to_string()),
                        ..Default::default()
                    },
                })
                .await
        );

        assert_eq!(
            assert_ok!(h.center.counters().read(wechat.namespace_id, CounterKind::Token).await),
            7
        );
    }

    #[tokio::test]
    async fn test_usage_window_override() {
        let h = TestHarness::new().await;
        let ns = h.namespace("wechat").await;
        h.rule(RuleFactory::token_limit(ns.namespace_id, 1000)).await;

        let usage = assert_ok!(
            h.center
                .get_counter_usage(ns.namespace_id, CounterKind::Token, Some("30m"))
                .await
        );
        assert_eq!(usage.window_start, Some(HOUR_START));
        assert_eq!(usage.window_end, Some(HOUR_START + 1800));

        // malformed windows fall back to 30 minutes
        let usage = assert_ok!(
            h.center
                .get_counter_usage(ns.namespace_id, CounterKind::Token, Some("soon"))
                .await
        );
        assert_eq!(usage.window_end, Some(HOUR_START + 1800));
    }

    #[tokio::test]
    async fn test_timeline_is_oldest_first() {
        let h = TestHarness::at(HOUR_START + 3 * 60 + 5).await;
        assert_ok!(h.center.increment(2, CounterKind::Qps, 3).await);
        h.clock.advance(Duration::from_secs(60));
        assert_ok!(h.center.increment(2, CounterKind::Qps, 8).await);

        let samples: Vec<Sample> = assert_ok!(
            h.center
                .get_timeline(2, CounterKind::Qps, 3, 60)
                .try_collect()
                .await
        );
        let values: Vec<u64> = samples.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![0, 3, 8]);
        assert_eq!(samples[2].timestamp, HOUR_START + 4 * 60);
        assert!(samples.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[tokio::test]
    async fn test_first_rule_of_a_kind_sets_the_limit() {
        let h = TestHarness::new().await;
        let ns = h.namespace("wechat").await;
        h.rule(RuleFactory::token_limit(ns.namespace_id, 50)).await;

        let rule = h
            .rule(NewRule::new(
                Some(ns.namespace_id),
                "daily tokens",
                RuleConfig::TokenLimit(TokenLimit {
                    max_tokens: 10_000,
                    window_seconds: Some(86_400),
                    model_name: Some("gpt-4o".to_string()),
                }),
            ))
            .await;
        assert_eq!(rule.rule_name, "daily tokens");

        let usage = assert_ok!(
            h.center
                .get_counter_usage(ns.namespace_id, CounterKind::Token, None)
                .await
        );
        assert_eq!(usage.max, 50);
    }
}
