use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Upstream server database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "upstream_servers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub server_id: i32,

    pub server_name: String,

    pub server_type: String,

    pub server_url: String,

    #[sea_orm(nullable)]
    pub api_key: Option<String>,

    /// JSON text
    #[sea_orm(column_type = "Text", nullable)]
    pub model_config: Option<String>,

    pub load_balance_weight: i32,

    pub max_connections: i32,

    pub timeout_connect: i32,

    pub timeout_read: i32,

    pub timeout_write: i32,

    #[sea_orm(nullable)]
    pub health_check_url: Option<String>,

    pub health_check_interval: i32,

    pub status: i32,

    pub create_time: DateTimeWithTimeZone,

    pub update_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_domain(&self) -> crate::core::models::Upstream {
        crate::core::models::Upstream {
            server_id: self.server_id,
            server_name: self.server_name.clone(),
            server_type: self.server_type.clone(),
            server_url: self.server_url.clone(),
            api_key: self.api_key.clone(),
            model_config: super::json_column(&self.model_config),
            load_balance_weight: self.load_balance_weight,
            max_connections: self.max_connections,
            timeout_connect: self.timeout_connect,
            timeout_read: self.timeout_read,
            timeout_write: self.timeout_write,
            health_check_url: self.health_check_url.clone(),
            health_check_interval: self.health_check_interval,
            status: super::status_from_db(self.status),
            create_time: super::to_utc(&self.create_time),
            update_time: super::to_utc(&self.update_time),
        }
    }
}
