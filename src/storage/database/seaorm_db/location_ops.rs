use crate::core::models::{Location, LocationPatch, NewLocation, Status};
use crate::utils::error::Result;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, json_text, location};
use super::connection::now;
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    pub async fn get_location(&self, location_id: i32) -> Result<Option<Location>> {
        let model = entities::Location::find_by_id(location_id).one(&self.db).await?;
        Ok(model.map(|m| m.to_domain()))
    }

    pub async fn list_locations(&self, status: Option<Status>) -> Result<Vec<Location>> {
        let models = entities::Location::find()
            .apply_if(status, |query, status| {
                query.filter(location::Column::Status.eq(status.as_i32()))
            })
            .order_by_asc(location::Column::Priority)
            .order_by_asc(location::Column::LocationId)
            .all(&self.db)
            .await?;
        Ok(models.iter().map(|m| m.to_domain()).collect())
    }

    pub async fn create_location(&self, new: &NewLocation) -> Result<Location> {
        debug!("Creating location: {}", new.path);

        let timestamp = now();
        let active_model = location::ActiveModel {
            path: Set(new.path.clone()),
            upstream_id: Set(new.upstream_id),
            proxy_cache: Set(new.proxy_cache),
            proxy_buffering: Set(new.proxy_buffering),
            proxy_pass: Set(new.proxy_pass.clone()),
            is_regex: Set(new.is_regex),
            limit_req_config: Set(json_text(&new.limit_req_config)),
            sse_support: Set(new.sse_support),
            chunked_transfer: Set(new.chunked_transfer),
            matcher_type: Set(new.matcher_type.clone()),
            match_field: Set(new.match_field.clone()),
            match_operator: Set(new.match_operator.clone()),
            match_value: Set(new.match_value.clone()),
            add_headers: Set(json_text(&new.add_headers)),
            rewrite_path: Set(new.rewrite_path.clone()),
            priority: Set(new.priority),
            status: Set(new.status.as_i32()),
            create_time: Set(timestamp),
            update_time: Set(timestamp),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(model.to_domain())
    }

    pub async fn update_location(&self, location_id: i32, patch: &LocationPatch) -> Result<Option<Location>> {
        debug!("Updating location: {}", location_id);

        let Some(model) = entities::Location::find_by_id(location_id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active_model: location::ActiveModel = model.into();
        if let Some(path) = &patch.path {
            active_model.path = Set(path.clone());
        }
        if let Some(upstream_id) = patch.upstream_id {
            active_model.upstream_id = Set(upstream_id);
        }
        if let Some(flag) = patch.proxy_cache {
            active_model.proxy_cache = Set(flag);
        }
        if let Some(flag) = patch.proxy_buffering {
            active_model.proxy_buffering = Set(flag);
        }
        if patch.proxy_pass.is_some() {
            active_model.proxy_pass = Set(patch.proxy_pass.clone());
        }
        if let Some(flag) = patch.is_regex {
            active_model.is_regex = Set(flag);
        }
        if patch.limit_req_config.is_some() {
            active_model.limit_req_config = Set(json_text(&patch.limit_req_config));
        }
        if let Some(flag) = patch.sse_support {
            active_model.sse_support = Set(flag);
        }
        if let Some(flag) = patch.chunked_transfer {
            active_model.chunked_transfer = Set(flag);
        }
        if patch.add_headers.is_some() {
            active_model.add_headers = Set(json_text(&patch.add_headers));
        }
        if patch.rewrite_path.is_some() {
            active_model.rewrite_path = Set(patch.rewrite_path.clone());
        }
        if let Some(priority) = patch.priority {
            active_model.priority = Set(priority);
        }
        if let Some(status) = patch.status {
            active_model.status = Set(status.as_i32());
        }
        active_model.update_time = Set(now());

        let model = active_model.update(&self.db).await?;
        Ok(Some(model.to_domain()))
    }

    pub async fn delete_location(&self, location_id: i32) -> Result<Option<Location>> {
        debug!("Deleting location: {}", location_id);

        let Some(model) = entities::Location::find_by_id(location_id).one(&self.db).await? else {
            return Ok(None);
        };
        entities::Location::delete_by_id(location_id).exec(&self.db).await?;
        Ok(Some(model.to_domain()))
    }
}
