use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use adpulse_connectors::{
    Connector, ConnectorRegistry, MetricsSink, Platform, SyncOutcome, TestOutcome,
};
use adpulse_core::CredentialCipher;
use adpulse_database::test_utils::setup_test_db;
use adpulse_database::DbConnection;
use adpulse_entities::{campaigns, companies, daily_metrics, integration_configs, sync_logs};
use adpulse_metrics::DailyMetricsService;
use adpulse_sync::SyncOrchestrator;

const TEST_KEY: &str = "0123456789abcdef0123456789abcdef";

/// Connector whose sync always fails with a fixed message
struct FailingConnector(&'static str);

#[async_trait]
impl Connector for FailingConnector {
    fn platform(&self) -> Platform {
        Platform::GoogleAds
    }

    async fn test_connection(&self, _credentials: &serde_json::Value) -> TestOutcome {
        TestOutcome::ok()
    }

    async fn sync(
        &self,
        _integration: &integration_configs::Model,
        _credentials: &serde_json::Value,
        _sink: &dyn MetricsSink,
    ) -> SyncOutcome {
        SyncOutcome::failed(self.0)
    }
}

async fn seed_company(db: &Arc<DbConnection>) -> anyhow::Result<companies::Model> {
    let company = companies::ActiveModel {
        name: Set("Acme".to_string()),
        active: Set(true),
        settings: Set(serde_json::json!({})),
        ..Default::default()
    }
    .insert(db.as_ref())
    .await?;
    Ok(company)
}

async fn seed_integration(
    db: &Arc<DbConnection>,
    cipher: &CredentialCipher,
    company_id: i32,
    platform: &str,
    credentials: serde_json::Value,
) -> anyhow::Result<integration_configs::Model> {
    let integration = integration_configs::ActiveModel {
        company_id: Set(company_id),
        platform: Set(platform.to_string()),
        name: Set(format!("{} integration", platform)),
        encrypted_credentials: Set(cipher.encrypt_object(&credentials)?),
        active: Set(true),
        ..Default::default()
    }
    .insert(db.as_ref())
    .await?;
    Ok(integration)
}

fn google_ads_credentials() -> serde_json::Value {
    serde_json::json!({
        "customer_id": "1234567890",
        "developer_token": "dev",
        "client_id": "id",
        "client_secret": "secret",
        "refresh_token": "refresh",
    })
}

fn orchestrator(
    db: Arc<DbConnection>,
    cipher: Arc<CredentialCipher>,
    registry: Arc<ConnectorRegistry>,
) -> SyncOrchestrator {
    let sink = Arc::new(DailyMetricsService::new(db.clone()));
    SyncOrchestrator::new(db, cipher, registry, sink)
}

#[tokio::test]
async fn test_connector_failure_leaves_terminal_records() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let cipher = Arc::new(CredentialCipher::new(TEST_KEY)?);
    let company = seed_company(&db).await?;
    let integration = seed_integration(
        &db,
        &cipher,
        company.id,
        "google_ads",
        google_ads_credentials(),
    )
    .await?;

    let mut registry = ConnectorRegistry::new();
    registry.register(Platform::GoogleAds, Arc::new(FailingConnector("X")));

    let orchestrator = orchestrator(db.clone(), cipher, Arc::new(registry));
    let outcome = orchestrator.sync_integration(&integration).await?;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("X"));

    let logs = sync_logs::Entity::find()
        .filter(sync_logs::Column::IntegrationId.eq(integration.id))
        .all(db.as_ref())
        .await?;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, "failed");
    assert_eq!(logs[0].error_message.as_deref(), Some("X"));
    assert!(logs[0].completed_at.is_some());

    let stored = integration_configs::Entity::find_by_id(integration.id)
        .one(db.as_ref())
        .await?
        .unwrap();
    assert_eq!(stored.last_sync_status.as_deref(), Some("failed"));
    assert_eq!(stored.last_sync_error.as_deref(), Some("X"));
    assert!(stored.last_sync_at.is_none());

    Ok(())
}

#[tokio::test]
async fn test_successful_run_persists_batch_and_status() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let cipher = Arc::new(CredentialCipher::new(TEST_KEY)?);
    let company = seed_company(&db).await?;
    let integration = seed_integration(
        &db,
        &cipher,
        company.id,
        "google_ads",
        google_ads_credentials(),
    )
    .await?;

    let registry = Arc::new(ConnectorRegistry::with_default_connectors());
    let orchestrator = orchestrator(db.clone(), cipher, registry);
    let outcome = orchestrator.sync_integration(&integration).await?;

    assert!(outcome.success);
    // 3 campaigns + 3 campaigns * 7 days
    assert_eq!(outcome.records_processed, 24);

    let log = sync_logs::Entity::find()
        .filter(sync_logs::Column::IntegrationId.eq(integration.id))
        .one(db.as_ref())
        .await?
        .unwrap();
    assert_eq!(log.status, "completed");
    assert_eq!(log.records_processed, Some(24));

    let stored = integration_configs::Entity::find_by_id(integration.id)
        .one(db.as_ref())
        .await?
        .unwrap();
    assert_eq!(stored.last_sync_status.as_deref(), Some("success"));
    assert!(stored.last_sync_error.is_none());
    assert!(stored.last_sync_at.is_some());

    let campaign_count = campaigns::Entity::find()
        .filter(campaigns::Column::CompanyId.eq(company.id))
        .count(db.as_ref())
        .await?;
    assert_eq!(campaign_count, 3);

    let metric_count = daily_metrics::Entity::find()
        .filter(daily_metrics::Column::CompanyId.eq(company.id))
        .count(db.as_ref())
        .await?;
    assert_eq!(metric_count, 21);

    Ok(())
}

#[tokio::test]
async fn test_undecryptable_credentials_record_a_failure() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let cipher = Arc::new(CredentialCipher::new(TEST_KEY)?);
    let company = seed_company(&db).await?;

    let integration = integration_configs::ActiveModel {
        company_id: Set(company.id),
        platform: Set("google_ads".to_string()),
        name: Set("Corrupted".to_string()),
        encrypted_credentials: Set("not-a-ciphertext".to_string()),
        active: Set(true),
        ..Default::default()
    }
    .insert(db.as_ref())
    .await?;

    let registry = Arc::new(ConnectorRegistry::with_default_connectors());
    let orchestrator = orchestrator(db.clone(), cipher, registry);
    let outcome = orchestrator.sync_integration(&integration).await?;

    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("decrypt"));

    let log = sync_logs::Entity::find()
        .filter(sync_logs::Column::IntegrationId.eq(integration.id))
        .one(db.as_ref())
        .await?
        .unwrap();
    assert_eq!(log.status, "failed");

    Ok(())
}

#[tokio::test]
async fn test_sibling_failure_does_not_abort_company_sync() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let cipher = Arc::new(CredentialCipher::new(TEST_KEY)?);
    let company = seed_company(&db).await?;

    seed_integration(
        &db,
        &cipher,
        company.id,
        "google_ads",
        google_ads_credentials(),
    )
    .await?;
    seed_integration(
        &db,
        &cipher,
        company.id,
        "tiktok_ads",
        serde_json::json!({"access_token": "tok", "advertiser_id": "123"}),
    )
    .await?;

    // Google fails, TikTok runs for real
    let mut registry = ConnectorRegistry::new();
    registry.register(Platform::GoogleAds, Arc::new(FailingConnector("quota")));
    registry.register(
        Platform::TiktokAds,
        Arc::new(adpulse_connectors::TiktokConnector::new()),
    );

    let orchestrator = orchestrator(db.clone(), cipher, Arc::new(registry));
    let summary = orchestrator.sync_company_integrations(company.id).await?;

    assert_eq!(summary.total, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    // 2 TikTok campaigns + 2 * 7 days
    assert_eq!(summary.records_processed, 16);

    Ok(())
}
