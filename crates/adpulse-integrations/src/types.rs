use adpulse_core::DBDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use adpulse_entities::integration_configs;

/// Integration representation returned by the API.
///
/// Built from the entity by dropping `encrypted_credentials`; ciphertext
/// never leaves the service layer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IntegrationInfo {
    pub id: i32,
    pub company_id: i32,
    pub platform: String,
    pub name: String,
    pub active: bool,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_sync_at: Option<DBDateTime>,
    pub last_sync_status: Option<String>,
    pub last_sync_error: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DBDateTime,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DBDateTime,
}

impl From<integration_configs::Model> for IntegrationInfo {
    fn from(model: integration_configs::Model) -> Self {
        Self {
            id: model.id,
            company_id: model.company_id,
            platform: model.platform,
            name: model.name,
            active: model.active,
            last_sync_at: model.last_sync_at,
            last_sync_status: model.last_sync_status,
            last_sync_error: model.last_sync_error,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateIntegrationRequest {
    pub company_id: i32,
    #[schema(example = "google_ads")]
    pub platform: String,
    pub name: String,
    /// Plaintext platform credentials; encrypted before storage
    #[schema(value_type = Object)]
    pub credentials: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TestConnectionRequest {
    #[schema(example = "google_ads")]
    pub platform: String,
    #[schema(value_type = Object)]
    pub credentials: serde_json::Value,
}
