//! Dual writes
//!
//! A mutation writes the relational store and a short-lived staging key in
//! the fast store at the same time. The relational write decides the
//! outcome. Once it succeeds the real cache keys are upserted (retried once)
//! and the staging key is dropped. If the relational write fails the staging
//! key is left to expire on its own.

use super::keys::{self, EntityType};
use super::rule_set;
use crate::core::context::AppContext;
use crate::core::models::{
    Location, LocationPatch, Matcher, MatcherPatch, MatcherTemplate, Namespace, NamespacePatch,
    NamespaceSnapshot, NewLocation, NewMatcher, NewNamespace, NewRule, NewUpstream, Rule,
    RulePatch, Status, Upstream, UpstreamPatch,
};
use crate::utils::error::{ConfigCenterError, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, info, warn};

/// Result of a successful mutation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteOutcome<T> {
    pub record: T,
    /// The relational write is durable but the cache could not be updated;
    /// the next read miss repopulates it
    pub cache_pending: bool,
}

impl<T> WriteOutcome<T> {
    fn map<U>(self, f: impl FnOnce(T) -> U) -> WriteOutcome<U> {
        WriteOutcome {
            record: f(self.record),
            cache_pending: self.cache_pending,
        }
    }
}

/// A single fast store effect of a mutation
#[derive(Debug, Clone, PartialEq)]
enum CacheOp {
    Set { key: String, value: String, ttl: u64 },
    Delete(String),
}

impl CacheOp {
    fn set<T: Serialize>(key: String, value: &T, ttl: u64) -> Result<Self> {
        Ok(CacheOp::Set {
            key,
            value: serde_json::to_string(value)?,
            ttl,
        })
    }
}

/// Writes to the relational store with best-effort cache maintenance
#[derive(Debug, Clone)]
pub struct DualWriteMutator {
    ctx: AppContext,
}

impl DualWriteMutator {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Run the relational `write` alongside a staging write of `payload`
    ///
    /// Returns the written record and the staging key, if staging worked.
    async fn stage_and_write<T, P, Fut>(&self, entity: EntityType, payload: &P, write: Fut) -> Result<(T, Option<String>)>
    where
        P: Serialize,
        Fut: Future<Output = Result<T>>,
    {
        let temp = keys::temp_key(entity);
        let staged_json = serde_json::to_string(payload)?;
        let stage = self
            .ctx
            .fast
            .set(&temp, &staged_json, Some(self.ctx.cache.temp_key_ttl));

        let (written, staged) = tokio::join!(write, stage);

        let staged = match staged {
            Ok(()) => Some(temp),
            Err(e) => {
                warn!("Staging write for {} failed: {}", entity, e);
                None
            }
        };
        match written {
            Ok(record) => Ok((record, staged)),
            Err(e) => {
                warn!("Relational write for {} failed: {}", entity, e);
                Err(e)
            }
        }
    }

    /// Apply cache effects, retrying once, then drop the staging key
    ///
    /// Returns whether the cache is left pending.
    async fn finish(&self, entity: EntityType, staged: Option<String>, ops: Result<Vec<CacheOp>>) -> bool {
        let applied = match ops {
            Ok(ops) => self.apply_with_retry(&ops).await,
            Err(e) => {
                warn!("Could not encode cache entries for {}: {}", entity, e);
                false
            }
        };

        if let Some(temp) = staged {
            if let Err(e) = self.ctx.fast.delete(&temp).await {
                debug!("Could not delete staging key {}: {}", temp, e);
            }
        }

        if !applied {
            warn!("Cache update for {} pending; the next read miss repopulates it", entity);
        }
        !applied
    }

    async fn apply_with_retry(&self, ops: &[CacheOp]) -> bool {
        for attempt in 1..=2 {
            match self.apply(ops).await {
                Ok(()) => return true,
                Err(e) => warn!("Cache upsert attempt {} failed: {}", attempt, e),
            }
        }
        false
    }

    async fn apply(&self, ops: &[CacheOp]) -> Result<()> {
        for op in ops {
            match op {
                CacheOp::Set { key, value, ttl } => self.ctx.fast.set(key, value, Some(*ttl)).await?,
                CacheOp::Delete(key) => self.ctx.fast.delete(key).await?,
            }
        }
        Ok(())
    }

    // Namespaces

    /// Create a namespace and its default matcher
    ///
    /// The matcher comes from the payload's template, or matches header
    /// `channelcode` against the namespace code. Failing to create it is
    /// logged and does not fail the namespace.
    pub async fn create_namespace(&self, new: &NewNamespace) -> Result<WriteOutcome<Namespace>> {
        new.validate()?;
        let (namespace, staged) = self
            .stage_and_write(EntityType::Namespaces, new, self.ctx.store.create_namespace(new))
            .await?;
        info!(
            "Created namespace {} ({})",
            namespace.namespace_id, namespace.namespace_code
        );

        let matcher = self.create_default_matcher(&namespace, new.matcher.as_ref()).await;
        let matchers: Vec<Matcher> = matcher.into_iter().collect();
        let snapshot = NamespaceSnapshot::from_parts(namespace.clone(), &matchers);

        let cache = &self.ctx.cache;
        let ops = (|| -> Result<Vec<CacheOp>> {
            Ok(vec![
                CacheOp::set(keys::namespace_key(namespace.namespace_id), &namespace, cache.namespace_ttl)?,
                CacheOp::set(
                    keys::namespace_code_key(&namespace.namespace_code),
                    &snapshot,
                    cache.namespace_ttl,
                )?,
                CacheOp::set(keys::matchers_key(namespace.namespace_id), &matchers, cache.matcher_ttl)?,
                CacheOp::Delete(keys::list_key(EntityType::Namespaces)),
            ])
        })();
        let cache_pending = self.finish(EntityType::Namespaces, staged, ops).await;

        Ok(WriteOutcome {
            record: namespace,
            cache_pending,
        })
    }

    async fn create_default_matcher(&self, namespace: &Namespace, template: Option<&MatcherTemplate>) -> Option<Matcher> {
        let template = template.cloned().unwrap_or_else(MatcherTemplate::channel_code);
        let new = NewMatcher {
            namespace_id: namespace.namespace_id,
            matcher_name: format!("{} channel matcher", namespace.namespace_name),
            matcher_type: template.matcher_type,
            match_field: template.match_field,
            match_operator: template.match_operator,
            match_value: template
                .match_value
                .unwrap_or_else(|| namespace.namespace_code.clone()),
            priority: template.priority,
            status: Status::Enabled,
        };

        match self.ctx.store.create_matcher(&new).await {
            Ok(matcher) => {
                debug!(
                    "Created default matcher {} for namespace {}",
                    matcher.matcher_id, namespace.namespace_id
                );
                Some(matcher)
            }
            Err(e) => {
                warn!(
                    "Could not create default matcher for namespace {}: {}",
                    namespace.namespace_id, e
                );
                None
            }
        }
    }

    pub async fn update_namespace(&self, namespace_id: i32, patch: &NamespacePatch) -> Result<WriteOutcome<Namespace>> {
        patch.validate()?;
        let write = self.ctx.retry.call("update namespace", || {
            self.ctx.store.update_namespace(namespace_id, patch)
        });
        let (updated, staged) = self.stage_and_write(EntityType::Namespaces, patch, write).await?;
        let namespace = updated.ok_or_else(|| namespace_not_found(namespace_id))?;

        let ops = (|| -> Result<Vec<CacheOp>> {
            Ok(vec![
                CacheOp::set(keys::namespace_key(namespace_id), &namespace, self.ctx.cache.namespace_ttl)?,
                CacheOp::Delete(keys::namespace_code_key(&namespace.namespace_code)),
                CacheOp::Delete(keys::list_key(EntityType::Namespaces)),
            ])
        })();
        let cache_pending = self.finish(EntityType::Namespaces, staged, ops).await;

        Ok(WriteOutcome {
            record: namespace,
            cache_pending,
        })
    }

    /// Hard delete a namespace with its rules and matchers, in both stores
    pub async fn delete_namespace(&self, namespace_id: i32) -> Result<WriteOutcome<Namespace>> {
        let rule_ids: Vec<i32> = rule_set::stored_rules(&self.ctx, namespace_id)
            .await
            .map(|rules| rules.iter().map(|r| r.rule_id).collect())
            .unwrap_or_default();

        let write = self.ctx.retry.call("delete namespace", || {
            self.ctx.store.delete_namespace(namespace_id)
        });
        let marker = DeleteMarker::new(namespace_id);
        let (deleted, staged) = self.stage_and_write(EntityType::Namespaces, &marker, write).await?;
        let namespace = deleted.ok_or_else(|| namespace_not_found(namespace_id))?;
        info!("Deleted namespace {} ({})", namespace_id, namespace.namespace_code);

        let mut ops = vec![
            CacheOp::Delete(keys::namespace_key(namespace_id)),
            CacheOp::Delete(keys::namespace_code_key(&namespace.namespace_code)),
            CacheOp::Delete(keys::list_key(EntityType::Namespaces)),
            CacheOp::Delete(keys::rules_key(namespace_id)),
            CacheOp::Delete(keys::matchers_key(namespace_id)),
            CacheOp::Delete(keys::list_key(EntityType::Policies)),
        ];
        ops.extend(rule_ids.into_iter().map(|id| CacheOp::Delete(keys::policy_key(id))));
        let cache_pending = self.finish(EntityType::Namespaces, staged, Ok(ops)).await;

        Ok(WriteOutcome {
            record: namespace,
            cache_pending,
        })
    }

    // Rules

    /// Create a rule; a namespace-scoped rule refreshes the namespace's rule
    /// set and resets its counters before returning
    pub async fn create_rule(&self, new: &NewRule) -> Result<WriteOutcome<Rule>> {
        new.validate()?;
        let baseline = self.baseline(new.namespace_id).await?;

        let (rule, staged) = self
            .stage_and_write(EntityType::Rules, new, self.ctx.store.create_rule(new))
            .await?;
        info!("Created rule {} ({})", rule.rule_id, rule.kind());

        let outcome = self
            .after_rule_write(rule.namespace_id, baseline, staged, |ops| {
                ops.push(CacheOp::set(keys::policy_key(rule.rule_id), &rule, self.ctx.cache.rule_ttl)?);
                Ok(())
            })
            .await;
        Ok(outcome.map(|()| rule))
    }

    pub async fn update_rule(&self, rule_id: i32, patch: &RulePatch) -> Result<WriteOutcome<Rule>> {
        patch.validate()?;
        let owner = self.rule_owner(rule_id).await?;
        let baseline = self.baseline(owner).await?;

        let write = self.ctx.retry.call("update rule", || self.ctx.store.update_rule(rule_id, patch));
        let (updated, staged) = self.stage_and_write(EntityType::Rules, patch, write).await?;
        let rule = updated.ok_or_else(|| rule_not_found(rule_id))?;
        info!("Updated rule {}", rule_id);

        let outcome = self
            .after_rule_write(rule.namespace_id, baseline, staged, |ops| {
                ops.push(CacheOp::set(keys::policy_key(rule_id), &rule, self.ctx.cache.rule_ttl)?);
                Ok(())
            })
            .await;
        Ok(outcome.map(|()| rule))
    }

    /// Delete a rule, returning the id of the namespace it belonged to
    pub async fn delete_rule(&self, rule_id: i32) -> Result<WriteOutcome<Option<i32>>> {
        let owner = self.rule_owner(rule_id).await?;
        let baseline = self.baseline(owner).await?;

        let write = self.ctx.retry.call("delete rule", || self.ctx.store.delete_rule(rule_id));
        let (existed, staged) = self
            .stage_and_write(EntityType::Rules, &DeleteMarker::new(rule_id), write)
            .await?;
        if !existed {
            return Err(rule_not_found(rule_id));
        }
        info!("Deleted rule {}", rule_id);

        let outcome = self
            .after_rule_write(owner, baseline, staged, |ops| {
                ops.push(CacheOp::Delete(keys::policy_key(rule_id)));
                Ok(())
            })
            .await;
        Ok(outcome.map(|()| owner))
    }

    async fn rule_owner(&self, rule_id: i32) -> Result<Option<i32>> {
        self.ctx
            .retry
            .call("find rule", || self.ctx.store.rule_namespace(rule_id))
            .await?
            .ok_or_else(|| rule_not_found(rule_id))
    }

    async fn baseline(&self, namespace_id: Option<i32>) -> Result<Option<Vec<Rule>>> {
        match namespace_id {
            Some(namespace_id) => Ok(Some(rule_set::capture_baseline(&self.ctx, namespace_id).await?)),
            None => Ok(None),
        }
    }

    /// Cache effects shared by every rule mutation
    ///
    /// Refreshes the owning namespace's rule set from the store, then resets
    /// its counters if the set changed from `baseline`.
    async fn after_rule_write(
        &self,
        namespace_id: Option<i32>,
        baseline: Option<Vec<Rule>>,
        staged: Option<String>,
        extra: impl FnOnce(&mut Vec<CacheOp>) -> Result<()>,
    ) -> WriteOutcome<()> {
        let mut ops = vec![CacheOp::Delete(keys::list_key(EntityType::Policies))];
        let mut encode = extra(&mut ops);

        let refreshed = match namespace_id {
            Some(namespace_id) => match rule_set::stored_rules(&self.ctx, namespace_id).await {
                Ok(rules) => {
                    if encode.is_ok() {
                        encode = CacheOp::set(keys::rules_key(namespace_id), &rules, self.ctx.cache.rule_ttl)
                            .map(|op| ops.push(op));
                    }
                    Some((namespace_id, rules))
                }
                Err(e) => {
                    warn!("Could not reload rules of namespace {}: {}", namespace_id, e);
                    ops.push(CacheOp::Delete(keys::rules_key(namespace_id)));
                    None
                }
            },
            None => None,
        };

        let mut cache_pending = self.finish(EntityType::Rules, staged, encode.map(|()| ops)).await;

        match refreshed {
            Some((namespace_id, rules)) => {
                rule_set::reset_if_changed(&self.ctx, namespace_id, baseline.as_deref(), &rules).await;
            }
            None if namespace_id.is_some() => cache_pending = true,
            None => {}
        }

        WriteOutcome {
            record: (),
            cache_pending,
        }
    }

    // Matchers

    pub async fn create_matcher(&self, new: &NewMatcher) -> Result<WriteOutcome<Matcher>> {
        new.validate()?;
        let (matcher, staged) = self
            .stage_and_write(EntityType::Matchers, new, self.ctx.store.create_matcher(new))
            .await?;
        let cache_pending = self.after_matcher_write(matcher.namespace_id, staged).await;
        Ok(WriteOutcome {
            record: matcher,
            cache_pending,
        })
    }

    pub async fn update_matcher(&self, matcher_id: i32, patch: &MatcherPatch) -> Result<WriteOutcome<Matcher>> {
        let write = self.ctx.retry.call("update matcher", || {
            self.ctx.store.update_matcher(matcher_id, patch)
        });
        let (updated, staged) = self.stage_and_write(EntityType::Matchers, patch, write).await?;
        let matcher = updated.ok_or_else(|| not_found("matcher", matcher_id))?;
        let cache_pending = self.after_matcher_write(matcher.namespace_id, staged).await;
        Ok(WriteOutcome {
            record: matcher,
            cache_pending,
        })
    }

    pub async fn delete_matcher(&self, matcher_id: i32) -> Result<WriteOutcome<Matcher>> {
        let write = self.ctx.retry.call("delete matcher", || self.ctx.store.delete_matcher(matcher_id));
        let (deleted, staged) = self
            .stage_and_write(EntityType::Matchers, &DeleteMarker::new(matcher_id), write)
            .await?;
        let matcher = deleted.ok_or_else(|| not_found("matcher", matcher_id))?;
        let cache_pending = self.after_matcher_write(matcher.namespace_id, staged).await;
        Ok(WriteOutcome {
            record: matcher,
            cache_pending,
        })
    }

    /// Refresh a namespace's matcher list and the snapshots built from it
    async fn after_matcher_write(&self, namespace_id: i32, staged: Option<String>) -> bool {
        let store = &self.ctx.store;
        let loaded = tokio::try_join!(
            store.list_matchers(Some(namespace_id), Some(Status::Enabled)),
            store.get_namespace(namespace_id),
        );

        let mut ops = vec![CacheOp::Delete(keys::list_key(EntityType::Namespaces))];
        let encoded = match loaded {
            Ok((matchers, namespace)) => {
                let cache = &self.ctx.cache;
                (|| -> Result<Vec<CacheOp>> {
                    ops.push(CacheOp::set(keys::matchers_key(namespace_id), &matchers, cache.matcher_ttl)?);
                    if let Some(namespace) = namespace {
                        let code_key = keys::namespace_code_key(&namespace.namespace_code);
                        let snapshot = NamespaceSnapshot::from_parts(namespace, &matchers);
                        ops.push(CacheOp::set(code_key, &snapshot, cache.namespace_ttl)?);
                    }
                    Ok(ops)
                })()
            }
            Err(e) => {
                warn!("Could not reload matchers of namespace {}: {}", namespace_id, e);
                ops.push(CacheOp::Delete(keys::matchers_key(namespace_id)));
                Ok(ops)
            }
        };
        self.finish(EntityType::Matchers, staged, encoded).await
    }

    // Upstreams

    pub async fn create_upstream(&self, new: &NewUpstream) -> Result<WriteOutcome<Upstream>> {
        new.validate()?;
        let (upstream, staged) = self
            .stage_and_write(EntityType::Upstreams, new, self.ctx.store.create_upstream(new))
            .await?;
        let ops = upsert_ops(
            keys::upstream_key(upstream.server_id),
            &upstream,
            self.ctx.cache.upstream_ttl,
            EntityType::Upstreams,
        );
        let cache_pending = self.finish(EntityType::Upstreams, staged, ops).await;
        Ok(WriteOutcome {
            record: upstream,
            cache_pending,
        })
    }

    pub async fn update_upstream(&self, server_id: i32, patch: &UpstreamPatch) -> Result<WriteOutcome<Upstream>> {
        patch.validate()?;
        let write = self.ctx.retry.call("update upstream", || {
            self.ctx.store.update_upstream(server_id, patch)
        });
        let (updated, staged) = self.stage_and_write(EntityType::Upstreams, patch, write).await?;
        let upstream = updated.ok_or_else(|| not_found("upstream", server_id))?;
        let ops = upsert_ops(
            keys::upstream_key(server_id),
            &upstream,
            self.ctx.cache.upstream_ttl,
            EntityType::Upstreams,
        );
        let cache_pending = self.finish(EntityType::Upstreams, staged, ops).await;
        Ok(WriteOutcome {
            record: upstream,
            cache_pending,
        })
    }

    pub async fn delete_upstream(&self, server_id: i32) -> Result<WriteOutcome<Upstream>> {
        let write = self.ctx.retry.call("delete upstream", || self.ctx.store.delete_upstream(server_id));
        let (deleted, staged) = self
            .stage_and_write(EntityType::Upstreams, &DeleteMarker::new(server_id), write)
            .await?;
        let upstream = deleted.ok_or_else(|| not_found("upstream", server_id))?;
        let ops = vec![
            CacheOp::Delete(keys::upstream_key(server_id)),
            CacheOp::Delete(keys::list_key(EntityType::Upstreams)),
            CacheOp::Delete(keys::list_key(EntityType::Locations)),
        ];
        let cache_pending = self.finish(EntityType::Upstreams, staged, Ok(ops)).await;
        Ok(WriteOutcome {
            record: upstream,
            cache_pending,
        })
    }

    // Locations

    pub async fn create_location(&self, new: &NewLocation) -> Result<WriteOutcome<Location>> {
        new.validate()?;
        let (location, staged) = self
            .stage_and_write(EntityType::Locations, new, self.ctx.store.create_location(new))
            .await?;
        let ops = upsert_ops(
            keys::location_key(location.location_id),
            &location,
            self.ctx.cache.location_ttl,
            EntityType::Locations,
        );
        let cache_pending = self.finish(EntityType::Locations, staged, ops).await;
        Ok(WriteOutcome {
            record: location,
            cache_pending,
        })
    }

    pub async fn update_location(&self, location_id: i32, patch: &LocationPatch) -> Result<WriteOutcome<Location>> {
        let write = self.ctx.retry.call("update location", || {
            self.ctx.store.update_location(location_id, patch)
        });
        let (updated, staged) = self.stage_and_write(EntityType::Locations, patch, write).await?;
        let location = updated.ok_or_else(|| not_found("location", location_id))?;
        let ops = upsert_ops(
            keys::location_key(location_id),
            &location,
            self.ctx.cache.location_ttl,
            EntityType::Locations,
        );
        let cache_pending = self.finish(EntityType::Locations, staged, ops).await;
        Ok(WriteOutcome {
            record: location,
            cache_pending,
        })
    }

    pub async fn delete_location(&self, location_id: i32) -> Result<WriteOutcome<Location>> {
        let write = self.ctx.retry.call("delete location", || {
            self.ctx.store.delete_location(location_id)
        });
        let (deleted, staged) = self
            .stage_and_write(EntityType::Locations, &DeleteMarker::new(location_id), write)
            .await?;
        let location = deleted.ok_or_else(|| not_found("location", location_id))?;
        let ops = vec![
            CacheOp::Delete(keys::location_key(location_id)),
            CacheOp::Delete(keys::list_key(EntityType::Locations)),
        ];
        let cache_pending = self.finish(EntityType::Locations, staged, Ok(ops)).await;
        Ok(WriteOutcome {
            record: location,
            cache_pending,
        })
    }

    // Batches

    /// Apply `ops` in order; one failing does not stop the rest
    pub async fn batch(&self, ops: Vec<WriteOp>) -> BatchWriteReport {
        let mut report = BatchWriteReport::default();
        for (index, op) in ops.into_iter().enumerate() {
            let name = op.name();
            match self.apply_op(op).await {
                Ok(summary) => report.succeeded.push(BatchItem {
                    index,
                    op: name,
                    id: summary.id,
                    cache_pending: summary.cache_pending,
                }),
                Err(e) => report.failed.push(BatchFailure {
                    index,
                    op: name,
                    error: e.to_string(),
                }),
            }
        }
        info!(
            "Batch write finished: {} succeeded, {} failed",
            report.succeeded.len(),
            report.failed.len()
        );
        report
    }

    /// Apply a single operation
    pub async fn apply_op(&self, op: WriteOp) -> Result<WriteSummary> {
        let summary = match op {
            WriteOp::CreateNamespace { data } => {
                let out = self.create_namespace(&data).await?;
                WriteSummary::new(EntityType::Namespaces, out.record.namespace_id, out.cache_pending)
            }
            WriteOp::UpdateNamespace { id, data } => {
                let out = self.update_namespace(id, &data).await?;
                WriteSummary::new(EntityType::Namespaces, id, out.cache_pending)
            }
            WriteOp::DeleteNamespace { id } => {
                let out = self.delete_namespace(id).await?;
                WriteSummary::new(EntityType::Namespaces, id, out.cache_pending)
            }
            WriteOp::CreateRule { data } => {
                let out = self.create_rule(&data).await?;
                WriteSummary::new(EntityType::Rules, out.record.rule_id, out.cache_pending)
            }
            WriteOp::UpdateRule { id, data } => {
                let out = self.update_rule(id, &data).await?;
                WriteSummary::new(EntityType::Rules, id, out.cache_pending)
            }
            WriteOp::DeleteRule { id } => {
                let out = self.delete_rule(id).await?;
                WriteSummary::new(EntityType::Rules, id, out.cache_pending)
            }
            WriteOp::CreateMatcher { data } => {
                let out = self.create_matcher(&data).await?;
                WriteSummary::new(EntityType::Matchers, out.record.matcher_id, out.cache_pending)
            }
            WriteOp::UpdateMatcher { id, data } => {
                let out = self.update_matcher(id, &data).await?;
                WriteSummary::new(EntityType::Matchers, id, out.cache_pending)
            }
            WriteOp::DeleteMatcher { id } => {
                let out = self.delete_matcher(id).await?;
                WriteSummary::new(EntityType::Matchers, id, out.cache_pending)
            }
            WriteOp::CreateUpstream { data } => {
                let out = self.create_upstream(&data).await?;
                WriteSummary::new(EntityType::Upstreams, out.record.server_id, out.cache_pending)
            }
            WriteOp::UpdateUpstream { id, data } => {
                let out = self.update_upstream(id, &data).await?;
                WriteSummary::new(EntityType::Upstreams, id, out.cache_pending)
            }
            WriteOp::DeleteUpstream { id } => {
                let out = self.delete_upstream(id).await?;
                WriteSummary::new(EntityType::Upstreams, id, out.cache_pending)
            }
            WriteOp::CreateLocation { data } => {
                let out = self.create_location(&data).await?;
                WriteSummary::new(EntityType::Locations, out.record.location_id, out.cache_pending)
            }
            WriteOp::UpdateLocation { id, data } => {
                let out = self.update_location(id, &data).await?;
                WriteSummary::new(EntityType::Locations, id, out.cache_pending)
            }
            WriteOp::DeleteLocation { id } => {
                let out = self.delete_location(id).await?;
                WriteSummary::new(EntityType::Locations, id, out.cache_pending)
            }
        };
        Ok(summary)
    }
}

/// Upsert one record and invalidate its entity's list
fn upsert_ops<T: Serialize>(key: String, record: &T, ttl: u64, entity: EntityType) -> Result<Vec<CacheOp>> {
    Ok(vec![
        CacheOp::set(key, record, ttl)?,
        CacheOp::Delete(keys::list_key(entity)),
    ])
}

/// Staging payload for deletions
#[derive(Debug, Serialize)]
struct DeleteMarker {
    op: &'static str,
    id: i32,
}

impl DeleteMarker {
    fn new(id: i32) -> Self {
        Self { op: "delete", id }
    }
}

fn namespace_not_found(namespace_id: i32) -> ConfigCenterError {
    not_found("namespace", namespace_id)
}

fn rule_not_found(rule_id: i32) -> ConfigCenterError {
    not_found("rule", rule_id)
}

fn not_found(entity: &str, id: i32) -> ConfigCenterError {
    ConfigCenterError::not_found(format!("{} {} does not exist", entity, id))
}

/// A mutation accepted by [`DualWriteMutator::apply_op`] and batch writes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WriteOp {
    CreateNamespace { data: NewNamespace },
    UpdateNamespace { id: i32, data: NamespacePatch },
    DeleteNamespace { id: i32 },
    CreateRule { data: NewRule },
    UpdateRule { id: i32, data: RulePatch },
    DeleteRule { id: i32 },
    CreateMatcher { data: NewMatcher },
    UpdateMatcher { id: i32, data: MatcherPatch },
    DeleteMatcher { id: i32 },
    CreateUpstream { data: NewUpstream },
    UpdateUpstream { id: i32, data: UpstreamPatch },
    DeleteUpstream { id: i32 },
    CreateLocation { data: NewLocation },
    UpdateLocation { id: i32, data: LocationPatch },
    DeleteLocation { id: i32 },
}

impl WriteOp {
    pub fn name(&self) -> &'static str {
        match self {
            WriteOp::CreateNamespace { .. } => "create_namespace",
            WriteOp::UpdateNamespace { .. } => "update_namespace",
            WriteOp::DeleteNamespace { .. } => "delete_namespace",
            WriteOp::CreateRule { .. } => "create_rule",
            WriteOp::UpdateRule { .. } => "update_rule",
            WriteOp::DeleteRule { .. } => "delete_rule",
            WriteOp::CreateMatcher { .. } => "create_matcher",
            WriteOp::UpdateMatcher { .. } => "update_matcher",
            WriteOp::DeleteMatcher { .. } => "delete_matcher",
            WriteOp::CreateUpstream { .. } => "create_upstream",
            WriteOp::UpdateUpstream { .. } => "update_upstream",
            WriteOp::DeleteUpstream { .. } => "delete_upstream",
            WriteOp::CreateLocation { .. } => "create_location",
            WriteOp::UpdateLocation { .. } => "update_location",
            WriteOp::DeleteLocation { .. } => "delete_location",
        }
    }
}

/// Id-level result of one applied [`WriteOp`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteSummary {
    pub entity: EntityType,
    pub id: i32,
    pub cache_pending: bool,
}

impl WriteSummary {
    fn new(entity: EntityType, id: i32, cache_pending: bool) -> Self {
        Self {
            entity,
            id,
            cache_pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItem {
    /// Position in the submitted batch
    pub index: usize,
    pub op: &'static str,
    pub id: i32,
    pub cache_pending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    pub index: usize,
    pub op: &'static str,
    pub error: String,
}

/// Outcome of a batch write
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchWriteReport {
    pub succeeded: Vec<BatchItem>,
    pub failed: Vec<BatchFailure>,
}

impl BatchWriteReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}
