//! Integration lifecycle: test, create (test-then-save), read, delete
//!
//! Credentials enter as plaintext JSON, are verified against the platform
//! connector, then stored encrypted. Nothing in this module hands ciphertext
//! or plaintext credentials back to callers.

use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use tracing::{info, warn};

use adpulse_connectors::{ConnectorRegistry, Platform, TestOutcome};
use adpulse_core::{CredentialCipher, ServiceError, ServiceResult};
use adpulse_database::DbConnection;
use adpulse_entities::{companies, integration_configs};

use crate::types::{CreateIntegrationRequest, IntegrationInfo};

#[derive(Clone)]
pub struct IntegrationService {
    db: Arc<DbConnection>,
    cipher: Arc<CredentialCipher>,
    registry: Arc<ConnectorRegistry>,
}

impl IntegrationService {
    pub fn new(
        db: Arc<DbConnection>,
        cipher: Arc<CredentialCipher>,
        registry: Arc<ConnectorRegistry>,
    ) -> Self {
        Self {
            db,
            cipher,
            registry,
        }
    }

    /// Runs a connector shape check against plaintext credentials
    pub async fn test_connection(
        &self,
        platform: Platform,
        credentials: &serde_json::Value,
    ) -> ServiceResult<TestOutcome> {
        let connector = self
            .registry
            .get(platform)
            .map_err(|e| ServiceError::Configuration {
                message: e.to_string(),
            })?;

        Ok(connector.test_connection(credentials).await)
    }

    /// Creates an integration after a passing connection test. A failing test
    /// rejects the save, so stored credentials are always shape-valid.
    pub async fn create(&self, request: CreateIntegrationRequest) -> ServiceResult<IntegrationInfo> {
        let platform =
            Platform::from_str(&request.platform).map_err(|_| ServiceError::Validation {
                message: format!("Unknown platform '{}'", request.platform),
            })?;

        companies::Entity::find_by_id(request.company_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound {
                resource: format!("Company {}", request.company_id),
            })?;

        let outcome = self.test_connection(platform, &request.credentials).await?;
        if !outcome.success {
            let message = outcome
                .error
                .unwrap_or_else(|| "Connection test failed".to_string());
            warn!(
                company_id = request.company_id,
                %platform,
                "Rejecting integration: {}",
                message
            );
            return Err(ServiceError::Validation { message });
        }

        let encrypted = self
            .cipher
            .encrypt_object(&request.credentials)
            .map_err(|e| ServiceError::Internal(e.into()))?;

        let integration = integration_configs::ActiveModel {
            company_id: Set(request.company_id),
            platform: Set(platform.to_string()),
            name: Set(request.name),
            encrypted_credentials: Set(encrypted),
            active: Set(true),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?;

        info!(
            integration_id = integration.id,
            company_id = integration.company_id,
            %platform,
            "Created integration"
        );

        Ok(integration.into())
    }

    pub async fn list_for_company(&self, company_id: i32) -> ServiceResult<Vec<IntegrationInfo>> {
        let integrations = integration_configs::Entity::find()
            .filter(integration_configs::Column::CompanyId.eq(company_id))
            .order_by_asc(integration_configs::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(integrations.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: i32) -> ServiceResult<IntegrationInfo> {
        self.find_model(id).await.map(Into::into)
    }

    pub async fn delete(&self, id: i32) -> ServiceResult<()> {
        let integration = self.find_model(id).await?;

        integration
            .delete(self.db.as_ref())
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        info!(integration_id = id, "Deleted integration");
        Ok(())
    }

    async fn find_model(&self, id: i32) -> ServiceResult<integration_configs::Model> {
        integration_configs::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound {
                resource: format!("Integration {}", id),
            })
    }
}
