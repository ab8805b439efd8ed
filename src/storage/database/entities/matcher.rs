use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Message matcher database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "message_matchers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub matcher_id: i32,

    pub namespace_id: i32,

    pub matcher_name: String,

    /// header / body
    pub matcher_type: String,

    pub match_field: String,

    pub match_operator: String,

    #[sea_orm(column_type = "Text")]
    pub match_value: String,

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
    pub fn to_domain(&self) -> crate::core::models::Matcher {
        crate::core::models::Matcher {
            matcher_id: self.matcher_id,
            namespace_id: self.namespace_id,
            matcher_name: self.matcher_name.clone(),
            matcher_type: self.matcher_type.clone(),
            match_field: self.match_field.clone(),
            match_operator: self.match_operator.clone(),
            match_value: self.match_value.clone(),
            priority: self.priority,
            status: super::status_from_db(self.status),
            create_time: super::to_utc(&self.create_time),
            update_time: super::to_utc(&self.update_time),
        }
    }
}
