//! Cached per-namespace rule sets and the counter reset they drive

use super::keys;
use crate::core::context::AppContext;
use crate::core::models::{Rule, Status};
use crate::core::rate_limiter::{changed, reset_on_change};
use crate::utils::error::Result;
use tracing::{debug, info, warn};

/// Rule set currently cached for a namespace
///
/// An absent, undecodable or unreachable entry is `None`: there is no
/// baseline to compare against.
pub(crate) async fn cached_rules(ctx: &AppContext, namespace_id: i32) -> Option<Vec<Rule>> {
    let key = keys::rules_key(namespace_id);
    match ctx.fast.get(&key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(rules) => Some(rules),
            Err(e) => {
                warn!("Ignoring undecodable rule set at {}: {}", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Could not read cached rule set {}: {}", key, e);
            None
        }
    }
}

/// Enabled rules of a namespace from the relational store
pub(crate) async fn stored_rules(ctx: &AppContext, namespace_id: i32) -> Result<Vec<Rule>> {
    ctx.retry
        .call("list rules", || {
            ctx.store.list_rules(Some(namespace_id), Some(Status::Enabled))
        })
        .await
}

/// The rule set a mutation is compared against: cache first, then the store
pub(crate) async fn capture_baseline(ctx: &AppContext, namespace_id: i32) -> Result<Vec<Rule>> {
    match cached_rules(ctx, namespace_id).await {
        Some(rules) => Ok(rules),
        None => stored_rules(ctx, namespace_id).await,
    }
}

/// Reset the namespace's counters when `rules` differs from `baseline`
///
/// Returns whether the set changed. A failed reset is logged; the counters
/// then correct themselves when their window rolls over.
pub(crate) async fn reset_if_changed(
    ctx: &AppContext,
    namespace_id: i32,
    baseline: Option<&[Rule]>,
    rules: &[Rule],
) -> bool {
    let Some(baseline) = baseline else {
        debug!("No cached rule set for namespace {}, skipping change detection", namespace_id);
        return false;
    };
    if !changed(baseline, rules) {
        return false;
    }

    info!("Rule set of namespace {} changed, resetting counters", namespace_id);
    if let Err(e) = reset_on_change(ctx, namespace_id, rules).await {
        warn!("Counter reset for namespace {} failed: {}", namespace_id, e);
    }
    true
}

/// Write a freshly loaded rule set, resetting counters if it differs from
/// what was cached
pub(crate) async fn publish_rules(ctx: &AppContext, namespace_id: i32, rules: &[Rule]) -> Result<bool> {
    let baseline = cached_rules(ctx, namespace_id).await;
    let json = serde_json::to_string(rules)?;
    ctx.fast
        .set(&keys::rules_key(namespace_id), &json, Some(ctx.cache.rule_ttl))
        .await?;
    Ok(reset_if_changed(ctx, namespace_id, baseline.as_deref(), rules).await)
}
