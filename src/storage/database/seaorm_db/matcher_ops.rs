use crate::core::models::{Matcher, MatcherPatch, NewMatcher, Status};
use crate::utils::error::Result;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, matcher};
use super::connection::now;
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    pub async fn get_matcher(&self, matcher_id: i32) -> Result<Option<Matcher>> {
        let model = entities::Matcher::find_by_id(matcher_id).one(&self.db).await?;
        Ok(model.map(|m| m.to_domain()))
    }

    pub async fn list_matchers(&self, namespace_id: Option<i32>, status: Option<Status>) -> Result<Vec<Matcher>> {
        let models = entities::Matcher::find()
            .apply_if(namespace_id, |query, id| query.filter(matcher::Column::NamespaceId.eq(id)))
            .apply_if(status, |query, status| {
                query.filter(matcher::Column::Status.eq(status.as_i32()))
            })
            .order_by_asc(matcher::Column::Priority)
            .order_by_asc(matcher::Column::MatcherId)
            .all(&self.db)
            .await?;
        Ok(models.iter().map(|m| m.to_domain()).collect())
    }

    pub async fn create_matcher(&self, new: &NewMatcher) -> Result<Matcher> {
        debug!("Creating matcher {} for namespace {}", new.matcher_name, new.namespace_id);

        let timestamp = now();
        let active_model = matcher::ActiveModel {
            namespace_id: Set(new.namespace_id),
            matcher_name: Set(new.matcher_name.clone()),
            matcher_type: Set(new.matcher_type.clone()),
            match_field: Set(new.match_field.clone()),
            match_operator: Set(new.match_operator.clone()),
            match_value: Set(new.match_value.clone()),
            priority: Set(new.priority),
            status: Set(new.status.as_i32()),
            create_time: Set(timestamp),
            update_time: Set(timestamp),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(model.to_domain())
    }

    pub async fn update_matcher(&self, matcher_id: i32, patch: &MatcherPatch) -> Result<Option<Matcher>> {
        debug!("Updating matcher: {}", matcher_id);

        let Some(model) = entities::Matcher::find_by_id(matcher_id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active_model: matcher::ActiveModel = model.into();
        if let Some(name) = &patch.matcher_name {
            active_model.matcher_name = Set(name.clone());
        }
        if let Some(matcher_type) = &patch.matcher_type {
            active_model.matcher_type = Set(matcher_type.clone());
        }
        if let Some(field) = &patch.match_field {
            active_model.match_field = Set(field.clone());
        }
        if let Some(operator) = &patch.match_operator {
            active_model.match_operator = Set(operator.clone());
        }
        if let Some(value) = &patch.match_value {
            active_model.match_value = Set(value.clone());
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

    pub async fn delete_matcher(&self, matcher_id: i32) -> Result<Option<Matcher>> {
        debug!("Deleting matcher: {}", matcher_id);

        let Some(model) = entities::Matcher::find_by_id(matcher_id).one(&self.db).await? else {
            return Ok(None);
        };
        entities::Matcher::delete_by_id(matcher_id).exec(&self.db).await?;
        Ok(Some(model.to_domain()))
    }
}
