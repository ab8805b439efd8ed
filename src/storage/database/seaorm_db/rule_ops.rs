use crate::core::models::{NewRule, Rule, RulePatch, Status};
use crate::utils::error::{ConfigCenterError, Result};
use sea_orm::*;
use tracing::{debug, warn};

use super::super::entities::{self, rule};
use super::connection::now;
use super::types::SeaOrmDatabase;

fn to_rule(model: &rule::Model) -> Result<Rule> {
    model
        .to_domain()
        .map_err(|message| ConfigCenterError::config_parse(model.rule_id, message))
}

impl SeaOrmDatabase {
    /// Find rule by ID; a stored payload that does not parse is a `ConfigParse` error
    pub async fn get_rule(&self, rule_id: i32) -> Result<Option<Rule>> {
        debug!("Finding rule by ID: {}", rule_id);

        let model = entities::Rule::find_by_id(rule_id).one(&self.db).await?;
        model.as_ref().map(to_rule).transpose()
    }

    pub async fn list_rules(&self, namespace_id: Option<i32>, status: Option<Status>) -> Result<Vec<Rule>> {
        let models = entities::Rule::find()
            .apply_if(namespace_id, |query, id| query.filter(rule::Column::NamespaceId.eq(id)))
            .apply_if(status, |query, status| query.filter(rule::Column::Status.eq(status.as_i32())))
            .order_by_asc(rule::Column::Priority)
            .order_by_asc(rule::Column::RuleId)
            .all(&self.db)
            .await?;

        let rules = models
            .iter()
            .filter_map(|model| match to_rule(model) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    warn!("Skipping rule {}: {}", model.rule_id, e);
                    None
                }
            })
            .collect();
        Ok(rules)
    }

    pub async fn create_rule(&self, new: &NewRule) -> Result<Rule> {
        debug!("Creating rule: {}", new.rule_name);

        let timestamp = now();
        let active_model = rule::ActiveModel {
            namespace_id: Set(new.namespace_id),
            rule_name: Set(new.rule_name.clone()),
            rule_type: Set(new.config.kind().as_str().to_string()),
            rule_config: Set(new.config.config_json()?),
            priority: Set(new.priority),
            status: Set(new.status.as_i32()),
            create_time: Set(timestamp),
            update_time: Set(timestamp),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        to_rule(&model)
    }

    pub async fn update_rule(&self, rule_id: i32, patch: &RulePatch) -> Result<Option<Rule>> {
        debug!("Updating rule: {}", rule_id);

        let Some(model) = entities::Rule::find_by_id(rule_id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active_model: rule::ActiveModel = model.into();
        if let Some(name) = &patch.rule_name {
            active_model.rule_name = Set(name.clone());
        }
        if let Some(config) = &patch.config {
            active_model.rule_type = Set(config.kind().as_str().to_string());
            active_model.rule_config = Set(config.config_json()?);
        }
        if let Some(priority) = patch.priority {
            active_model.priority = Set(priority);
        }
        if let Some(status) = patch.status {
            active_model.status = Set(status.as_i32());
        }
        active_model.update_time = Set(now());

        let model = active_model.update(&self.db).await?;
        to_rule(&model).map(Some)
    }

    /// Owning namespace of a rule, read without parsing its payload
    pub async fn rule_namespace(&self, rule_id: i32) -> Result<Option<Option<i32>>> {
        let model = entities::Rule::find_by_id(rule_id).one(&self.db).await?;
        Ok(model.map(|m| m.namespace_id))
    }

    pub async fn delete_rule(&self, rule_id: i32) -> Result<bool> {
        debug!("Deleting rule: {}", rule_id);

        let result = entities::Rule::delete_by_id(rule_id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
