use crate::core::models::{Namespace, NamespacePatch, NewNamespace, Status};
use crate::utils::error::{ConfigCenterError, Result};
use sea_orm::*;
use tracing::{debug, info};

use super::super::entities::{self, matcher, namespace, rule};
use super::connection::now;
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Find namespace by ID
    pub async fn get_namespace(&self, namespace_id: i32) -> Result<Option<Namespace>> {
        debug!("Finding namespace by ID: {}", namespace_id);

        let model = entities::Namespace::find_by_id(namespace_id).one(&self.db).await?;
        Ok(model.map(|m| m.to_domain()))
    }

    /// Find namespace by its code
    pub async fn get_namespace_by_code(&self, code: &str) -> Result<Option<Namespace>> {
        debug!("Finding namespace by code: {}", code);

        let model = entities::Namespace::find()
            .filter(namespace::Column::NamespaceCode.eq(code))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.to_domain()))
    }

    pub async fn list_namespaces(&self, status: Option<Status>) -> Result<Vec<Namespace>> {
        let models = entities::Namespace::find()
            .apply_if(status, |query, status| {
                query.filter(namespace::Column::Status.eq(status.as_i32()))
            })
            .order_by_asc(namespace::Column::NamespaceId)
            .all(&self.db)
            .await?;
        Ok(models.iter().map(|m| m.to_domain()).collect())
    }

    pub async fn create_namespace(&self, new: &NewNamespace) -> Result<Namespace> {
        debug!("Creating namespace: {}", new.namespace_code);

        if self.get_namespace_by_code(&new.namespace_code).await?.is_some() {
            return Err(ConfigCenterError::conflict(format!(
                "namespace_code '{}' already exists",
                new.namespace_code
            )));
        }

        let timestamp = now();
        let active_model = namespace::ActiveModel {
            namespace_code: Set(new.namespace_code.clone()),
            namespace_name: Set(new.namespace_name.clone()),
            description: Set(new.description.clone()),
            status: Set(new.status.as_i32()),
            create_time: Set(timestamp),
            update_time: Set(timestamp),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        info!("Created namespace {} ({})", model.namespace_id, model.namespace_code);
        Ok(model.to_domain())
    }

    pub async fn update_namespace(&self, namespace_id: i32, patch: &NamespacePatch) -> Result<Option<Namespace>> {
        debug!("Updating namespace: {}", namespace_id);

        let Some(model) = entities::Namespace::find_by_id(namespace_id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active_model: namespace::ActiveModel = model.into();
        if let Some(name) = &patch.namespace_name {
            active_model.namespace_name = Set(name.clone());
        }
        if let Some(description) = &patch.description {
            active_model.description = Set(Some(description.clone()));
        }
        if let Some(status) = patch.status {
            active_model.status = Set(status.as_i32());
        }
        active_model.update_time = Set(now());

        let model = active_model.update(&self.db).await?;
        Ok(Some(model.to_domain()))
    }

    /// Hard-delete a namespace together with its rules and matchers
    pub async fn delete_namespace(&self, namespace_id: i32) -> Result<Option<Namespace>> {
        debug!("Deleting namespace: {}", namespace_id);

        let txn = self.db.begin().await?;

        let Some(model) = entities::Namespace::find_by_id(namespace_id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        let rules = entities::Rule::delete_many()
            .filter(rule::Column::NamespaceId.eq(namespace_id))
            .exec(&txn)
            .await?;
        let matchers = entities::Matcher::delete_many()
            .filter(matcher::Column::NamespaceId.eq(namespace_id))
            .exec(&txn)
            .await?;
        entities::Namespace::delete_by_id(namespace_id).exec(&txn).await?;

        txn.commit().await?;

        info!(
            "Deleted namespace {} with {} rules and {} matchers",
            namespace_id, rules.rows_affected, matchers.rows_affected
        );
        Ok(Some(model.to_domain()))
    }
}
