//! Relational store abstraction
//!
//! The relational store is the system of record. Status is applied as a
//! query-time filter; nothing is soft-deleted.

use crate::core::models::{
    Location, LocationPatch, MatcherPatch, Namespace, NamespacePatch, NewLocation,
    NewMatcher, NewNamespace, NewRule, NewUpstream, Rule, RulePatch, Status, Upstream,
    UpstreamPatch,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Per-entity CRUD against the system of record
///
/// Lookups return `Ok(None)` for absent rows. Updates return the new row, or
/// `None` when the id does not exist. Deletes return the removed row, except
/// for rules, whose stored payload may no longer parse.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get_namespace(&self, namespace_id: i32) -> Result<Option<Namespace>>;
    async fn get_namespace_by_code(&self, code: &str) -> Result<Option<Namespace>>;
    async fn list_namespaces(&self, status: Option<Status>) -> Result<Vec<Namespace>>;
    async fn create_namespace(&self, new: &NewNamespace) -> Result<Namespace>;
    async fn update_namespace(&self, namespace_id: i32, patch: &NamespacePatch) -> Result<Option<Namespace>>;
    /// Also removes the namespace's rules and matchers
    async fn delete_namespace(&self, namespace_id: i32) -> Result<Option<Namespace>>;

    async fn get_rule(&self, rule_id: i32) -> Result<Option<Rule>>;
    /// Rules of one namespace, or every rule when `namespace_id` is `None`,
    /// ordered by priority then id. Rules whose payload does not parse are skipped.
    async fn list_rules(&self, namespace_id: Option<i32>, status: Option<Status>) -> Result<Vec<Rule>>;
    async fn create_rule(&self, new: &NewRule) -> Result<Rule>;
    async fn update_rule(&self, rule_id: i32, patch: &RulePatch) -> Result<Option<Rule>>;
    /// Returns whether the rule existed
    async fn delete_rule(&self, rule_id: i32) -> Result<bool>;
    /// Owning namespace of a rule without parsing its payload:
    /// `None` if the rule does not exist, `Some(None)` for a global policy
    async fn rule_namespace(&self, rule_id: i32) -> Result<Option<Option<i32>>>;

    async fn get_matcher(&self, matcher_id: i32) -> Result<Option<crate::core::models::Matcher>>;
    async fn list_matchers(&self, namespace_id: Option<i32>, status: Option<Status>) -> Result<Vec<crate::core::models::Matcher>>;
    async fn create_matcher(&self, new: &NewMatcher) -> Result<crate::core::models::Matcher>;
    async fn update_matcher(&self, matcher_id: i32, patch: &MatcherPatch) -> Result<Option<crate::core::models::Matcher>>;
    async fn delete_matcher(&self, matcher_id: i32) -> Result<Option<crate::core::models::Matcher>>;

    async fn get_upstream(&self, server_id: i32) -> Result<Option<Upstream>>;
    async fn list_upstreams(&self, status: Option<Status>) -> Result<Vec<Upstream>>;
    async fn create_upstream(&self, new: &NewUpstream) -> Result<Upstream>;
    async fn update_upstream(&self, server_id: i32, patch: &UpstreamPatch) -> Result<Option<Upstream>>;
    async fn delete_upstream(&self, server_id: i32) -> Result<Option<Upstream>>;

    async fn get_location(&self, location_id: i32) -> Result<Option<Location>>;
    async fn list_locations(&self, status: Option<Status>) -> Result<Vec<Location>>;
    async fn create_location(&self, new: &NewLocation) -> Result<Location>;
    async fn update_location(&self, location_id: i32, patch: &LocationPatch) -> Result<Option<Location>>;
    async fn delete_location(&self, location_id: i32) -> Result<Option<Location>>;

    async fn health_check(&self) -> Result<()>;
}
