use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Location rule database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "location_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub location_id: i32,

    pub path: String,

    pub upstream_id: i32,

    pub proxy_cache: bool,

    pub proxy_buffering: bool,

    #[sea_orm(nullable)]
    pub proxy_pass: Option<String>,

    pub is_regex: bool,

    #[sea_orm(column_type = "Text", nullable)]
    pub limit_req_config: Option<String>,

    pub sse_support: bool,

    pub chunked_transfer: bool,

    pub matcher_type: String,

    #[sea_orm(nullable)]
    pub match_field: Option<String>,

    #[sea_orm(nullable)]
    pub match_operator: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub match_value: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub add_headers: Option<String>,

    #[sea_orm(nullable)]
    pub rewrite_path: Option<String>,

    pub priority: i32,

    pub status: i32,

    pub create_time: DateTimeWithTimeZone,

    pub update_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::upstream::Entity",
        from = "Column::UpstreamId",
        to = "super::upstream::Column::ServerId"
    )]
    Upstream,
}

impl Related<super::upstream::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Upstream.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_domain(&self) -> crate::core::models::Location {
        crate::core::models::Location {
            location_id: self.location_id,
            path: self.path.clone(),
            upstream_id: self.upstream_id,
            proxy_cache: self.proxy_cache,
            proxy_buffering: self.proxy_buffering,
            proxy_pass: self.proxy_pass.clone(),
            is_regex: self.is_regex,
            limit_req_config: super::json_column(&self.limit_req_config),
            sse_support: self.sse_support,
            chunked_transfer: self.chunked_transfer,
            matcher_type: self.matcher_type.clone(),
            match_field: self.match_field.clone(),
            match_operator: self.match_operator.clone(),
            match_value: self.match_value.clone(),
            add_headers: super::json_column(&self.add_headers),
            rewrite_path: self.rewrite_path.clone(),
            priority: self.priority,
            status: super::status_from_db(self.status),
            create_time: super::to_utc(&self.create_time),
            update_time: super::to_utc(&self.update_time),
        }
    }
}
