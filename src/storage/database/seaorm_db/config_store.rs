//! [`ConfigStore`] implementation backed by SeaORM

use super::types::SeaOrmDatabase;
use crate::core::models::{
    Location, LocationPatch, Matcher, MatcherPatch, Namespace, NamespacePatch, NewLocation,
    NewMatcher, NewNamespace, NewRule, NewUpstream, Rule, RulePatch, Status, Upstream,
    UpstreamPatch,
};
use crate::storage::ConfigStore;
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
impl ConfigStore for SeaOrmDatabase {
    async fn get_namespace(&self, namespace_id: i32) -> Result<Option<Namespace>> {
        SeaOrmDatabase::get_namespace(self, namespace_id).await
    }

    async fn get_namespace_by_code(&self, code: &str) -> Result<Option<Namespace>> {
        SeaOrmDatabase::get_namespace_by_code(self, code).await
    }

    async fn list_namespaces(&self, status: Option<Status>) -> Result<Vec<Namespace>> {
        SeaOrmDatabase::list_namespaces(self, status).await
    }

    async fn create_namespace(&self, new: &NewNamespace) -> Result<Namespace> {
        SeaOrmDatabase::create_namespace(self, new).await
    }

    async fn update_namespace(&self, namespace_id: i32, patch: &NamespacePatch) -> Result<Option<Namespace>> {
        SeaOrmDatabase::update_namespace(self, namespace_id, patch).await
    }

    async fn delete_namespace(&self, namespace_id: i32) -> Result<Option<Namespace>> {
        SeaOrmDatabase::delete_namespace(self, namespace_id).await
    }

    async fn get_rule(&self, rule_id: i32) -> Result<Option<Rule>> {
        SeaOrmDatabase::get_rule(self, rule_id).await
    }

    async fn list_rules(&self, namespace_id: Option<i32>, status: Option<Status>) -> Result<Vec<Rule>> {
        SeaOrmDatabase::list_rules(self, namespace_id, status).await
    }

    async fn create_rule(&self, new: &NewRule) -> Result<Rule> {
        SeaOrmDatabase::create_rule(self, new).await
    }

    async fn update_rule(&self, rule_id: i32, patch: &RulePatch) -> Result<Option<Rule>> {
        SeaOrmDatabase::update_rule(self, rule_id, patch).await
    }

    async fn delete_rule(&self, rule_id: i32) -> Result<bool> {
        SeaOrmDatabase::delete_rule(self, rule_id).await
    }

    async fn rule_namespace(&self, rule_id: i32) -> Result<Option<Option<i32>>> {
        SeaOrmDatabase::rule_namespace(self, rule_id).await
    }

    async fn get_matcher(&self, matcher_id: i32) -> Result<Option<Matcher>> {
        SeaOrmDatabase::get_matcher(self, matcher_id).await
    }

    async fn list_matchers(&self, namespace_id: Option<i32>, status: Option<Status>) -> Result<Vec<Matcher>> {
        SeaOrmDatabase::list_matchers(self, namespace_id, status).await
    }

    async fn create_matcher(&self, new: &NewMatcher) -> Result<Matcher> {
        SeaOrmDatabase::create_matcher(self, new).await
    }

    async fn update_matcher(&self, matcher_id: i32, patch: &MatcherPatch) -> Result<Option<Matcher>> {
        SeaOrmDatabase::update_matcher(self, matcher_id, patch).await
    }

    async fn delete_matcher(&self, matcher_id: i32) -> Result<Option<Matcher>> {
        SeaOrmDatabase::delete_matcher(self, matcher_id).await
    }

    async fn get_upstream(&self, server_id: i32) -> Result<Option<Upstream>> {
        SeaOrmDatabase::get_upstream(self, server_id).await
    }

    async fn list_upstreams(&self, status: Option<Status>) -> Result<Vec<Upstream>> {
        SeaOrmDatabase::list_upstreams(self, status).await
    }

    async fn create_upstream(&self, new: &NewUpstream) -> Result<Upstream> {
        SeaOrmDatabase::create_upstream(self, new).await
    }

    async fn update_upstream(&self, server_id: i32, patch: &UpstreamPatch) -> Result<Option<Upstream>> {
        SeaOrmDatabase::update_upstream(self, server_id, patch).await
    }

    async fn delete_upstream(&self, server_id: i32) -> Result<Option<Upstream>> {
        SeaOrmDatabase::delete_upstream(self, server_id).await
    }

    async fn get_location(&self, location_id: i32) -> Result<Option<Location>> {
        SeaOrmDatabase::get_location(self, location_id).await
    }

    async fn list_locations(&self, status: Option<Status>) -> Result<Vec<Location>> {
        SeaOrmDatabase::list_locations(self, status).await
    }

    async fn create_location(&self, new: &NewLocation) -> Result<Location> {
        SeaOrmDatabase::create_location(self, new).await
    }

    async fn update_location(&self, location_id: i32, patch: &LocationPatch) -> Result<Option<Location>> {
        SeaOrmDatabase::update_location(self, location_id, patch).await
    }

    async fn delete_location(&self, location_id: i32) -> Result<Option<Location>> {
        SeaOrmDatabase::delete_location(self, location_id).await
    }

    async fn health_check(&self) -> Result<()> {
        self.ping().await
    }
}
