use crate::core::models::{NewUpstream, Status, Upstream, UpstreamPatch};
use crate::utils::error::Result;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, json_text, upstream};
use super::connection::now;
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    pub async fn get_upstream(&self, server_id: i32) -> Result<Option<Upstream>> {
        let model = entities::Upstream::find_by_id(server_id).one(&self.db).await?;
        Ok(model.map(|m| m.to_domain()))
    }

    pub async fn list_upstreams(&self, status: Option<Status>) -> Result<Vec<Upstream>> {
        let models = entities::Upstream::find()
            .apply_if(status, |query, status| {
                query.filter(upstream::Column::Status.eq(status.as_i32()))
            })
            .order_by_asc(upstream::Column::ServerId)
            .all(&self.db)
            .await?;
        Ok(models.iter().map(|m| m.to_domain()).collect())
    }

    pub async fn create_upstream(&self, new: &NewUpstream) -> Result<Upstream> {
        debug!("Creating upstream: {}", new.server_name);

        let timestamp = now();
        let active_model = upstream::ActiveModel {
            server_name: Set(new.server_name.clone()),
            server_type: Set(new.server_type.clone()),
            server_url: Set(new.server_url.clone()),
            api_key: Set(new.api_key.clone()),
            model_config: Set(json_text(&new.model_config)),
            load_balance_weight: Set(new.load_balance_weight),
            max_connections: Set(new.max_connections),
            timeout_connect: Set(new.timeout_connect),
            timeout_read: Set(new.timeout_read),
            timeout_write: Set(new.timeout_write),
            health_check_url: Set(new.health_check_url.clone()),
            health_check_interval: Set(new.health_check_interval),
            status: Set(new.status.as_i32()),
            create_time: Set(timestamp),
            update_time: Set(timestamp),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(model.to_domain())
    }

    pub async fn update_upstream(&self, server_id: i32, patch: &UpstreamPatch) -> Result<Option<Upstream>> {
        debug!("Updating upstream: {}", server_id);

        let Some(model) = entities::Upstream::find_by_id(server_id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active_model: upstream::ActiveModel = model.into();
        if let Some(name) = &patch.server_name {
            active_model.server_name = Set(name.clone());
        }
        if let Some(server_type) = &patch.server_type {
            active_model.server_type = Set(server_type.clone());
        }
        if let Some(url) = &patch.server_url {
            active_model.server_url = Set(url.clone());
        }
        if patch.api_key.is_some() {
            active_model.api_key = Set(patch.api_key.clone());
        }
        if patch.model_config.is_some() {
            active_model.model_config = Set(json_text(&patch.model_config));
        }
        if let Some(weight) = patch.load_balance_weight {
            active_model.load_balance_weight = Set(weight);
        }
        if let Some(max) = patch.max_connections {
            active_model.max_connections = Set(max);
        }
        if let Some(timeout) = patch.timeout_connect {
            active_model.timeout_connect = Set(timeout);
        }
        if let Some(timeout) = patch.timeout_read {
            active_model.timeout_read = Set(timeout);
        }
        if let Some(timeout) = patch.timeout_write {
            active_model.timeout_write = Set(timeout);
        }
        if patch.health_check_url.is_some() {
            active_model.health_check_url = Set(patch.health_check_url.clone());
        }
        if let Some(interval) = patch.health_check_interval {
            active_model.health_check_interval = Set(interval);
        }
        if let Some(status) = patch.status {
            active_model.status = Set(status.as_i32());
        }
        active_model.update_time = Set(now());

        let model = active_model.update(&self.db).await?;
        Ok(Some(model.to_domain()))
    }

    pub async fn delete_upstream(&self, server_id: i32) -> Result<Option<Upstream>> {
        debug!("Deleting upstream: {}", server_id);

        let Some(model) = entities::Upstream::find_by_id(server_id).one(&self.db).await? else {
            return Ok(None);
        };
        entities::Upstream::delete_by_id(server_id).exec(&self.db).await?;
        Ok(Some(model.to_domain()))
    }
}
