//! Periodic full snapshot sync
//!
//! Rewrites every cached configuration key from the relational store so a
//! missed invalidation cannot leave the fast store drifting for longer than
//! one interval.

use super::keys::{self, EntityType};
use super::rule_set;
use crate::core::context::AppContext;
use crate::core::models::{Matcher, NamespaceSnapshot, Rule, Status};
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// What one sync pass wrote
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub namespaces: usize,
    pub rules: usize,
    pub matchers: usize,
    pub upstreams: usize,
    pub locations: usize,
    /// Namespaces whose cached rule set differed, so their counters were reset
    pub changed_namespaces: Vec<i32>,
    /// Fast store writes that failed
    pub failed_writes: usize,
}

/// Copy the enabled configuration into the fast store once
///
/// Fails only when the relational store cannot be read; fast store failures
/// are counted in the report.
pub async fn sync_once(ctx: &AppContext) -> Result<SyncReport> {
    let store = &ctx.store;
    let (namespaces, matchers, rules, upstreams, locations) = ctx
        .retry
        .call("load snapshot", || async move {
            tokio::try_join!(
                store.list_namespaces(Some(Status::Enabled)),
                store.list_matchers(None, Some(Status::Enabled)),
                store.list_rules(None, Some(Status::Enabled)),
                store.list_upstreams(Some(Status::Enabled)),
                store.list_locations(Some(Status::Enabled)),
            )
        })
        .await?;

    let mut report = SyncReport {
        namespaces: namespaces.len(),
        rules: rules.len(),
        matchers: matchers.len(),
        upstreams: upstreams.len(),
        locations: locations.len(),
        ..SyncReport::default()
    };
    let mut writer = SnapshotWriter {
        ctx,
        failed: 0,
    };

    let mut matchers_by_ns: HashMap<i32, Vec<Matcher>> = HashMap::new();
    for matcher in matchers {
        matchers_by_ns.entry(matcher.namespace_id).or_default().push(matcher);
    }
    let mut rules_by_ns: HashMap<i32, Vec<Rule>> = HashMap::new();
    for rule in &rules {
        if let Some(namespace_id) = rule.namespace_id {
            rules_by_ns.entry(namespace_id).or_default().push(rule.clone());
        }
    }

    let cache = &ctx.cache;
    let mut snapshots = Vec::with_capacity(namespaces.len());
    for namespace in namespaces {
        let id = namespace.namespace_id;
        let ns_matchers = matchers_by_ns.remove(&id).unwrap_or_default();
        let snapshot = NamespaceSnapshot::from_parts(namespace, &ns_matchers);

        writer.set(&keys::namespace_key(id), &snapshot.namespace, cache.namespace_ttl).await;
        writer
            .set(
                &keys::namespace_code_key(&snapshot.namespace.namespace_code),
                &snapshot,
                cache.namespace_ttl,
            )
            .await;
        writer.set(&keys::matchers_key(id), &ns_matchers, cache.matcher_ttl).await;

        let ns_rules = rules_by_ns.remove(&id).unwrap_or_default();
        match rule_set::publish_rules(ctx, id, &ns_rules).await {
            Ok(true) => report.changed_namespaces.push(id),
            Ok(false) => {}
            Err(e) => {
                warn!("Sync of rules for namespace {} failed: {}", id, e);
                writer.failed += 1;
            }
        }
        snapshots.push(snapshot);
    }
    writer
        .set(&keys::list_key(EntityType::Namespaces), &snapshots, cache.namespace_ttl)
        .await;

    for rule in &rules {
        writer.set(&keys::policy_key(rule.rule_id), rule, cache.rule_ttl).await;
    }
    writer.set(&keys::list_key(EntityType::Policies), &rules, cache.rule_ttl).await;

    for upstream in &upstreams {
        writer
            .set(&keys::upstream_key(upstream.server_id), upstream, cache.upstream_ttl)
            .await;
    }
    writer
        .set(&keys::list_key(EntityType::Upstreams), &upstreams, cache.upstream_ttl)
        .await;

    for location in &locations {
        writer
            .set(&keys::location_key(location.location_id), location, cache.location_ttl)
            .await;
    }
    writer
        .set(&keys::list_key(EntityType::Locations), &locations, cache.location_ttl)
        .await;

    report.failed_writes = writer.failed;
    if report.failed_writes > 0 {
        warn!(
            "Config sync finished with {} failed fast store writes",
            report.failed_writes
        );
    } else {
        info!(
            "Config sync finished: {} namespaces, {} rules, {} upstreams, {} locations",
            report.namespaces, report.rules, report.upstreams, report.locations
        );
    }
    Ok(report)
}

struct SnapshotWriter<'a> {
    ctx: &'a AppContext,
    failed: usize,
}

impl SnapshotWriter<'_> {
    async fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T, ttl: u64) {
        let result = match serde_json::to_string(value) {
            Ok(json) => self.ctx.fast.set(key, &json, Some(ttl)).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            debug!("Sync write of {} failed: {}", key, e);
            self.failed += 1;
        }
    }
}

/// Run [`sync_once`] every `interval` until `shutdown` turns true or its
/// sender is dropped
pub fn spawn_sync_loop(ctx: AppContext, interval: Duration, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        if *shutdown.borrow_and_update() {
            debug!("Config sync not started, shutdown already signalled");
            return;
        }
        info!("Config sync running every {:?}", interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = sync_once(&ctx).await {
                        warn!("Config sync failed: {}", e);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Config sync stopped");
    })
}
