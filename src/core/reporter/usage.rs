//! Usage snapshots for dashboards

use super::timeline::{Sample, collect_timeline};
use crate::core::cache::CacheReader;
use crate::core::context::AppContext;
use crate::core::models::{CounterKind, Quota, Rule};
use crate::core::rate_limiter::{CounterEngine, CounterUsage, TimeWindow, Window};
use crate::utils::error::Result;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

/// Hourly token buckets shown on the monitoring view
const TOKEN_BUCKETS: (usize, u64) = (24, 3600);
/// Per-minute QPS buckets shown on the monitoring view
const QPS_BUCKETS: (usize, u64) = (60, 60);

/// Usage of every quota a namespace has
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceUsage {
    pub namespace_id: i32,
    pub namespace_code: String,
    pub namespace_name: String,
    pub current_time: u64,
    /// Window override applied to windowed counters, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window: Option<TimeWindow>,
    pub metrics: UsageMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<CounterUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qps_usage: Option<CounterUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrent_usage: Option<CounterUsage>,
}

impl UsageMetrics {
    fn slot(&mut self, kind: CounterKind) -> &mut Option<CounterUsage> {
        match kind {
            CounterKind::Token => &mut self.token_usage,
            CounterKind::Qps => &mut self.qps_usage,
            CounterKind::Concurrent => &mut self.concurrent_usage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageOverview {
    pub total_namespaces: usize,
    pub namespaces: Vec<NamespaceUsage>,
}

/// Which timelines the monitoring view includes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricSelection {
    #[default]
    All,
    Token,
    Qps,
    Concurrent,
}

impl MetricSelection {
    fn includes(self, kind: CounterKind) -> bool {
        match self {
            MetricSelection::All => true,
            MetricSelection::Token => kind == CounterKind::Token,
            MetricSelection::Qps => kind == CounterKind::Qps,
            MetricSelection::Concurrent => kind == CounterKind::Concurrent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoringView {
    pub namespace_id: i32,
    pub current_time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_timeline: Option<Vec<Sample>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qps_timeline: Option<Vec<Sample>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrent_timeline: Option<Vec<Sample>>,
}

/// Read-only views over namespaces, their rules and their counters
#[derive(Debug, Clone)]
pub struct UsageReporter {
    ctx: AppContext,
    reader: CacheReader,
    counters: CounterEngine,
}

impl UsageReporter {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            reader: CacheReader::new(ctx.clone()),
            counters: CounterEngine::new(ctx.clone()),
            ctx,
        }
    }

    /// Usage of one counter against the namespace's limit for it
    ///
    /// The limit comes from the first enabled rule of the matching kind; with
    /// no such rule the counter is unlimited. `window` overrides the rule's
    /// window size for windowed counters.
    pub async fn counter_usage(
        &self,
        namespace_id: i32,
        kind: CounterKind,
        window: Option<TimeWindow>,
    ) -> Result<CounterUsage> {
        let rules = self.reader.rules(namespace_id).await?;
        let quota = quota_for(&rules, kind, &self.ctx).unwrap_or(Quota {
            kind,
            max: 0,
            window_seconds: self.counters.default_window(kind),
        });
        self.usage_for(namespace_id, &quota, window).await
    }

    async fn usage_for(&self, namespace_id: i32, quota: &Quota, window: Option<TimeWindow>) -> Result<CounterUsage> {
        if !quota.kind.is_windowed() {
            let current = self.counters.read(namespace_id, quota.kind).await?;
            return Ok(CounterUsage::new(current, quota.max, None));
        }

        let size = window.map(|w| w.seconds).unwrap_or(quota.window_seconds);
        let window = Window::containing(self.ctx.now(), size);
        let current = self
            .counters
            .read_window(namespace_id, quota.kind, window.start)
            .await?;
        Ok(CounterUsage::new(current, quota.max, Some(window)))
    }

    /// Usage of every quota rule of a namespace; `None` if it does not exist
    pub async fn namespace_usage(&self, namespace_id: i32, window: Option<TimeWindow>) -> Result<Option<NamespaceUsage>> {
        let Some(namespace) = self.reader.namespace(namespace_id).await? else {
            return Ok(None);
        };
        let rules = self.reader.rules(namespace_id).await?;

        let mut metrics = UsageMetrics::default();
        for rule in &rules {
            let Some(quota) = rule.config.quota(&self.ctx.rate_limit) else {
                continue;
            };
            let slot = metrics.slot(quota.kind);
            if slot.is_none() {
                *slot = Some(self.usage_for(namespace_id, &quota, window).await?);
            }
        }

        Ok(Some(NamespaceUsage {
            namespace_id,
            namespace_code: namespace.namespace_code,
            namespace_name: namespace.namespace_name,
            current_time: self.ctx.now(),
            time_window: window,
            metrics,
        }))
    }

    /// Usage of every enabled namespace
    pub async fn overview(&self) -> Result<UsageOverview> {
        let snapshots = self.reader.namespaces().await?;
        let usages = try_join_all(
            snapshots
                .iter()
                .map(|s| self.namespace_usage(s.namespace.namespace_id, None)),
        )
        .await?;
        let namespaces: Vec<NamespaceUsage> = usages.into_iter().flatten().collect();

        Ok(UsageOverview {
            total_namespaces: namespaces.len(),
            namespaces,
        })
    }

    /// Token (24 hours), QPS (60 minutes) and concurrency timelines
    pub async fn monitoring(&self, namespace_id: i32, selection: MetricSelection) -> Result<MonitoringView> {
        let mut view = MonitoringView {
            namespace_id,
            current_time: self.ctx.now(),
            token_timeline: None,
            qps_timeline: None,
            concurrent_timeline: None,
        };

        if selection.includes(CounterKind::Token) {
            let (count, size) = TOKEN_BUCKETS;
            view.token_timeline =
                Some(collect_timeline(&self.ctx, namespace_id, CounterKind::Token, count, size).await?);
        }
        if selection.includes(CounterKind::Qps) {
            let (count, size) = QPS_BUCKETS;
            view.qps_timeline = Some(collect_timeline(&self.ctx, namespace_id, CounterKind::Qps, count, size).await?);
        }
        if selection.includes(CounterKind::Concurrent) {
            view.concurrent_timeline =
                Some(collect_timeline(&self.ctx, namespace_id, CounterKind::Concurrent, 1, 0).await?);
        }
        Ok(view)
    }
}

/// Quota of the first enabled rule gating on `kind`; rules are already
/// ordered by priority
fn quota_for(rules: &[Rule], kind: CounterKind, ctx: &AppContext) -> Option<Quota> {
    rules
        .iter()
        .filter(|r| r.status.is_enabled())
        .filter_map(|r| r.config.quota(&ctx.rate_limit))
        .find(|q| q.kind == kind)
}
