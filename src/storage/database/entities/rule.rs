use crate::core::models::RuleConfig;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Rule database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub rule_id: i32,

    /// Null for a global policy
    #[sea_orm(nullable)]
    pub namespace_id: Option<i32>,

    pub rule_name: String,

    /// matcher / token_limit / qps_limit / concurrent_limit
    pub rule_type: String,

    /// JSON payload interpreted per `rule_type`
    #[sea_orm(column_type = "Text")]
    pub rule_config: String,

    pub priority: i32,

    pub status: i32,

    pub create_time: DateTimeWithTimeZone,

    pub update_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::namespace::Entity",
        from = "Column::NamespaceId",
        to = "super::namespace::Column::NamespaceId"
    )]
    Namespace,
}

impl Related<super::namespace::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Namespace.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain record, failing when the stored payload does not parse
    pub fn to_domain(&self) -> Result<crate::core::models::Rule, String> {
        let config = RuleConfig::from_parts(&self.rule_type, &self.rule_config)?;
        Ok(crate::core::models::Rule {
            rule_id: self.rule_id,
            namespace_id: self.namespace_id,
            rule_name: self.rule_name.clone(),
            config,
            priority: self.priority,
            status: super::status_from_db(self.status),
            create_time: super::to_utc(&self.create_time),
            update_time: super::to_utc(&self.update_time),
        })
    }
}
