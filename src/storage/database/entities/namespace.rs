use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Namespace database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "namespaces")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub namespace_id: i32,

    /// Immutable business key
    #[sea_orm(unique)]
    pub namespace_code: String,

    pub namespace_name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// 1 enabled, 0 disabled
    pub status: i32,

    pub create_time: DateTimeWithTimeZone,

    pub update_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rule::Entity")]
    Rule,
    #[sea_orm(has_many = "super::matcher::Entity")]
    Matcher,
}

impl Related<super::rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rule.def()
    }
}

impl Related<super::matcher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Matcher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain record
    pub fn to_domain(&self) -> crate::core::models::Namespace {
        crate::core::models::Namespace {
            namespace_id: self.namespace_id,
            namespace_code: self.namespace_code.clone(),
            namespace_name: self.namespace_name.clone(),
            description: self.description.clone(),
            status: super::status_from_db(self.status),
            create_time: super::to_utc(&self.create_time),
            update_time: super::to_utc(&self.update_time),
        }
    }
}
