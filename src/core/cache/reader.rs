//! Cache-aside reads
//!
//! Every read checks the fast store first. On a miss the relational store
//! answers and the fast store is repopulated by a detached background task,
//! so the caller never waits for the cache write. Absent records are not
//! cached. A fast store that cannot be reached, or holds a value that does
//! not decode, is treated as a miss.

use super::keys::{self, EntityType};
use super::rule_set;
use crate::core::context::AppContext;
use crate::core::models::{Location, Matcher, Namespace, NamespaceSnapshot, Rule, Status, Upstream};
use crate::utils::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use tracing::{debug, info, warn};

/// Read-through access to every cached entity
#[derive(Debug, Clone)]
pub struct CacheReader {
    ctx: AppContext,
}

impl CacheReader {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Single record at `key`, loading it with `load` on a miss
    pub async fn read_through<T, F, Fut>(&self, key: &str, ttl: u64, load: F) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        if let Some(value) = self.cached(key).await {
            return Ok(Some(value));
        }

        let loaded = self.ctx.retry.call(key, load).await?;
        if let Some(value) = &loaded {
            self.populate(key, value, ttl);
        }
        Ok(loaded)
    }

    /// List at `key`; an empty list is returned but not cached
    pub async fn read_list<T, F, Fut>(&self, key: &str, ttl: u64, load: F) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        if let Some(values) = self.cached(key).await {
            return Ok(values);
        }

        let loaded = self.ctx.retry.call(key, load).await?;
        if !loaded.is_empty() {
            self.populate(key, &loaded, ttl);
        }
        Ok(loaded)
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.ctx.fast.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    debug!("Cache hit: {}", key);
                    Some(value)
                }
                Err(e) => {
                    warn!("Discarding undecodable cache entry {}: {}", key, e);
                    None
                }
            },
            Ok(None) => {
                debug!("Cache miss: {}", key);
                None
            }
            Err(e) => {
                warn!("Fast store read of {} failed, reading relational store: {}", key, e);
                None
            }
        }
    }

    /// Write `value` to the fast store in the background
    fn populate<T: Serialize>(&self, key: &str, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("Could not encode {} for caching: {}", key, e);
                return;
            }
        };
        let fast = self.ctx.fast.clone();
        let key = key.to_string();
        self.ctx.tasks.spawn("cache populate", async move {
            fast.set(&key, &json, Some(ttl)).await
        });
    }

    pub async fn namespace(&self, namespace_id: i32) -> Result<Option<Namespace>> {
        self.read_through(
            &keys::namespace_key(namespace_id),
            self.ctx.cache.namespace_ttl,
            || self.ctx.store.get_namespace(namespace_id),
        )
        .await
    }

    /// Namespace and its first matcher, looked up by business code
    pub async fn namespace_by_code(&self, code: &str) -> Result<Option<NamespaceSnapshot>> {
        self.read_through(
            &keys::namespace_code_key(code),
            self.ctx.cache.namespace_ttl,
            || self.load_snapshot(code),
        )
        .await
    }

    async fn load_snapshot(&self, code: &str) -> Result<Option<NamespaceSnapshot>> {
        let Some(namespace) = self.ctx.store.get_namespace_by_code(code).await? else {
            return Ok(None);
        };
        let matchers = self
            .ctx
            .store
            .list_matchers(Some(namespace.namespace_id), Some(Status::Enabled))
            .await?;
        Ok(Some(NamespaceSnapshot::from_parts(namespace, &matchers)))
    }

    /// Every enabled namespace with its first matcher
    pub async fn namespaces(&self) -> Result<Vec<NamespaceSnapshot>> {
        self.read_list(
            &keys::list_key(EntityType::Namespaces),
            self.ctx.cache.namespace_ttl,
            || load_snapshots(&self.ctx),
        )
        .await
    }

    /// Enabled rules of a namespace, ordered by priority then id
    pub async fn rules(&self, namespace_id: i32) -> Result<Vec<Rule>> {
        self.read_list(
            &keys::rules_key(namespace_id),
            self.ctx.cache.rule_ttl,
            || self.ctx.store.list_rules(Some(namespace_id), Some(Status::Enabled)),
        )
        .await
    }

    pub async fn policy(&self, rule_id: i32) -> Result<Option<Rule>> {
        self.read_through(
            &keys::policy_key(rule_id),
            self.ctx.cache.rule_ttl,
            || self.ctx.store.get_rule(rule_id),
        )
        .await
    }

    /// Every enabled rule, namespace-scoped and global
    pub async fn policies(&self) -> Result<Vec<Rule>> {
        self.read_list(
            &keys::list_key(EntityType::Policies),
            self.ctx.cache.rule_ttl,
            || self.ctx.store.list_rules(None, Some(Status::Enabled)),
        )
        .await
    }

    pub async fn matchers(&self, namespace_id: i32) -> Result<Vec<Matcher>> {
        self.read_list(
            &keys::matchers_key(namespace_id),
            self.ctx.cache.matcher_ttl,
            || self.ctx.store.list_matchers(Some(namespace_id), Some(Status::Enabled)),
        )
        .await
    }

    pub async fn upstream(&self, server_id: i32) -> Result<Option<Upstream>> {
        self.read_through(
            &keys::upstream_key(server_id),
            self.ctx.cache.upstream_ttl,
            || self.ctx.store.get_upstream(server_id),
        )
        .await
    }

    pub async fn upstreams(&self) -> Result<Vec<Upstream>> {
        self.read_list(
            &keys::list_key(EntityType::Upstreams),
            self.ctx.cache.upstream_ttl,
            || self.ctx.store.list_upstreams(Some(Status::Enabled)),
        )
        .await
    }

    pub async fn location(&self, location_id: i32) -> Result<Option<Location>> {
        self.read_through(
            &keys::location_key(location_id),
            self.ctx.cache.location_ttl,
            || self.ctx.store.get_location(location_id),
        )
        .await
    }

    pub async fn locations(&self) -> Result<Vec<Location>> {
        self.read_list(
            &keys::list_key(EntityType::Locations),
            self.ctx.cache.location_ttl,
            || self.ctx.store.list_locations(Some(Status::Enabled)),
        )
        .await
    }

    /// Several namespaces in one fast store round trip
    ///
    /// Results are in request order; misses fall back to the relational
    /// store one by one.
    pub async fn batch_namespaces(&self, namespace_ids: &[i32]) -> Result<Vec<Option<Namespace>>> {
        let keys: Vec<String> = namespace_ids.iter().map(|id| keys::namespace_key(*id)).collect();
        let cached = match self.ctx.fast.mget(&keys).await {
            Ok(values) => values,
            Err(e) => {
                warn!("Batch cache read failed, reading relational store: {}", e);
                vec![None; keys.len()]
            }
        };

        let mut results = Vec::with_capacity(namespace_ids.len());
        for ((namespace_id, key), raw) in namespace_ids.iter().zip(&keys).zip(cached) {
            let hit = raw.and_then(|raw| match serde_json::from_str::<Namespace>(&raw) {
                Ok(namespace) => Some(namespace),
                Err(e) => {
                    warn!("Discarding undecodable cache entry {}: {}", key, e);
                    None
                }
            });
            if hit.is_some() {
                results.push(hit);
                continue;
            }

            let loaded = self
                .ctx
                .retry
                .call(key, || self.ctx.store.get_namespace(*namespace_id))
                .await?;
            if let Some(namespace) = &loaded {
                self.populate(key, namespace, self.ctx.cache.namespace_ttl);
            }
            results.push(loaded);
        }
        Ok(results)
    }

    /// Load a namespace, its matchers and its rules together and cache them
    ///
    /// Returns `false` when the namespace does not exist. Cache writes are
    /// awaited; a failed one is logged.
    pub async fn preload_namespace(&self, namespace_id: i32) -> Result<bool> {
        let store = &self.ctx.store;
        let (namespace, matchers, rules) = tokio::try_join!(
            store.get_namespace(namespace_id),
            store.list_matchers(Some(namespace_id), Some(Status::Enabled)),
            store.list_rules(Some(namespace_id), Some(Status::Enabled)),
        )?;
        let Some(namespace) = namespace else {
            return Ok(false);
        };

        let cache = &self.ctx.cache;
        let snapshot = NamespaceSnapshot::from_parts(namespace.clone(), &matchers);
        let writes = [
            (keys::namespace_key(namespace_id), serde_json::to_string(&namespace)?, cache.namespace_ttl),
            (
                keys::namespace_code_key(&namespace.namespace_code),
                serde_json::to_string(&snapshot)?,
                cache.namespace_ttl,
            ),
            (keys::matchers_key(namespace_id), serde_json::to_string(&matchers)?, cache.matcher_ttl),
        ];
        for (key, json, ttl) in &writes {
            if let Err(e) = self.ctx.fast.set(key, json, Some(*ttl)).await {
                warn!("Preload of {} failed: {}", key, e);
            }
        }
        if let Err(e) = rule_set::publish_rules(&self.ctx, namespace_id, &rules).await {
            warn!("Preload of rules for namespace {} failed: {}", namespace_id, e);
        }

        info!(
            "Preloaded namespace {} ({} matchers, {} rules)",
            namespace_id,
            matchers.len(),
            rules.len()
        );
        Ok(true)
    }
}

/// Enabled namespaces paired with their first enabled matcher
async fn load_snapshots(ctx: &AppContext) -> Result<Vec<NamespaceSnapshot>> {
    let (namespaces, matchers) = tokio::try_join!(
        ctx.store.list_namespaces(Some(Status::Enabled)),
        ctx.store.list_matchers(None, Some(Status::Enabled)),
    )?;

    let mut by_namespace: HashMap<i32, Vec<Matcher>> = HashMap::new();
    for matcher in matchers {
        by_namespace.entry(matcher.namespace_id).or_default().push(matcher);
    }

    Ok(namespaces
        .into_iter()
        .map(|namespace| {
            let matchers = by_namespace
                .get(&namespace.namespace_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            NamespaceSnapshot::from_parts(namespace, matchers)
        })
        .collect())
}
