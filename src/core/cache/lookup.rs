//! Entity-generic read entry point
//!
//! API handlers address records by entity family plus an id, a namespace
//! code or the family list. Each combination maps onto one typed
//! [`CacheReader`] method.

use super::keys::EntityType;
use super::reader::CacheReader;
use crate::core::models::{Location, Matcher, Namespace, NamespaceSnapshot, Rule, Upstream};
use crate::utils::error::{ConfigCenterError, Result};
use serde::{Deserialize, Serialize};

/// How a record is addressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum Lookup {
    /// Record id, or the namespace id for rules and matchers
    Id(i32),
    /// Namespace business code
    Code(String),
    /// Every enabled record of the family
    List,
}

/// Whatever a [`Lookup`] resolved to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Namespace(Namespace),
    Snapshot(NamespaceSnapshot),
    Snapshots(Vec<NamespaceSnapshot>),
    Rule(Rule),
    Rules(Vec<Rule>),
    Matchers(Vec<Matcher>),
    Upstream(Upstream),
    Upstreams(Vec<Upstream>),
    Location(Location),
    Locations(Vec<Location>),
}

impl CacheReader {
    /// Read-through by entity family
    ///
    /// `None` means the record exists in neither store. Lists are always
    /// returned, possibly empty. Combinations without a key layout are a
    /// validation error.
    pub async fn lookup(&self, entity: EntityType, lookup: Lookup) -> Result<Option<Record>> {
        let record = match (entity, lookup) {
            (EntityType::Namespaces, Lookup::Id(id)) => self.namespace(id).await?.map(Record::Namespace),
            (EntityType::Namespaces, Lookup::Code(code)) => {
                self.namespace_by_code(&code).await?.map(Record::Snapshot)
            }
            (EntityType::Namespaces, Lookup::List) => Some(Record::Snapshots(self.namespaces().await?)),
            (EntityType::Rules, Lookup::Id(namespace_id)) => Some(Record::Rules(self.rules(namespace_id).await?)),
            (EntityType::Rules, Lookup::Code(code)) => match self.namespace_by_code(&code).await? {
                Some(snapshot) => Some(Record::Rules(self.rules(snapshot.namespace.namespace_id).await?)),
                None => None,
            },
            (EntityType::Policies, Lookup::Id(rule_id)) => self.policy(rule_id).await?.map(Record::Rule),
            (EntityType::Policies, Lookup::List) => Some(Record::Rules(self.policies().await?)),
            (EntityType::Matchers, Lookup::Id(namespace_id)) => {
                Some(Record::Matchers(self.matchers(namespace_id).await?))
            }
            (EntityType::Upstreams, Lookup::Id(id)) => self.upstream(id).await?.map(Record::Upstream),
            (EntityType::Upstreams, Lookup::List) => Some(Record::Upstreams(self.upstreams().await?)),
            (EntityType::Locations, Lookup::Id(id)) => self.location(id).await?.map(Record::Location),
            (EntityType::Locations, Lookup::List) => Some(Record::Locations(self.locations().await?)),
            (entity, lookup) => {
                return Err(ConfigCenterError::validation(format!(
                    "{} cannot be looked up by {:?}",
                    entity, lookup
                )));
            }
        };
        Ok(record)
    }
}
