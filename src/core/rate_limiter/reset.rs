//! Counter reset after a configuration change

use super::window::Window;
use crate::core::cache::keys;
use crate::core::context::AppContext;
use crate::core::models::{CounterKind, Rule};
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// What a reset touched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResetReport {
    pub namespace_id: i32,
    /// Keys set to 0
    pub reset_keys: Vec<String>,
    /// Stale window keys deleted
    pub removed_keys: u64,
}

/// Zero the live counters of every quota rule in `rules` and drop other windows
///
/// A request that increments between the configuration write and this call
/// loses that increment; the next window starts clean either way.
pub async fn reset_on_change(ctx: &AppContext, namespace_id: i32, rules: &[Rule]) -> Result<ResetReport> {
    let now = ctx.now();
    let mut live: BTreeMap<CounterKind, Vec<String>> = BTreeMap::new();
    let mut report = ResetReport {
        namespace_id,
        ..ResetReport::default()
    };

    for rule in rules {
        let Some(quota) = rule.config.quota(&ctx.rate_limit) else {
            continue;
        };
        let keep = live.entry(quota.kind).or_default();

        if quota.kind.is_windowed() {
            let window = Window::containing(now, quota.window_seconds);
            let key = keys::counter_key(namespace_id, quota.kind, window.start);
            if keep.contains(&key) {
                continue;
            }
            ctx.fast
                .reset_until(&key, window.expire_at(ctx.rate_limit.grace_period))
                .await?;
            keep.push(key.clone());
            report.reset_keys.push(key);
        } else {
            let key = keys::concurrent_key(namespace_id);
            if keep.contains(&key) {
                continue;
            }
            ctx.fast.set(&key, "0", None).await?;
            keep.push(key.clone());
            report.reset_keys.push(key);
        }
    }

    for (kind, keep) in &live {
        if !kind.is_windowed() {
            continue;
        }
        let stale: Vec<String> = ctx
            .fast
            .scan_keys(&keys::counter_pattern(namespace_id, *kind))
            .await?
            .into_iter()
            .filter(|key| !keep.contains(key))
            .collect();
        if !stale.is_empty() {
            debug!("Removing {} stale {} counters for namespace {}", stale.len(), kind, namespace_id);
            report.removed_keys += ctx.fast.delete_many(&stale).await?;
        }
    }

    info!(
        "Reset {} counters for namespace {} ({} stale removed)",
        report.reset_keys.len(),
        namespace_id,
        report.removed_keys
    );
    Ok(report)
}
