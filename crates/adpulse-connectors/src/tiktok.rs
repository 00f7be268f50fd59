//! TikTok Ads connector

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::mock::{sync_mock_batch, MetricProfile, MockCampaign};
use crate::types::{
    require_str, Connector, ConnectorError, MetricsSink, Platform, SyncOutcome, TestOutcome,
};
use adpulse_entities::integration_configs;

pub struct TiktokConnector;

impl TiktokConnector {
    pub fn new() -> Self {
        Self
    }

    fn validate_credentials(credentials: &Value) -> Result<(), ConnectorError> {
        require_str(credentials, "access_token")?;

        let advertiser_id = require_str(credentials, "advertiser_id")?;
        if advertiser_id.is_empty() || !advertiser_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConnectorError::InvalidFormat {
                field: "advertiser_id".to_string(),
                reason: "must be a numeric advertiser id".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for TiktokConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for TiktokConnector {
    fn platform(&self) -> Platform {
        Platform::TiktokAds
    }

    async fn test_connection(&self, credentials: &Value) -> TestOutcome {
        match Self::validate_credentials(credentials) {
            Ok(()) => TestOutcome::ok(),
            Err(e) => e.into(),
        }
    }

    async fn sync(
        &self,
        integration: &integration_configs::Model,
        credentials: &Value,
        sink: &dyn MetricsSink,
    ) -> SyncOutcome {
        if let Err(e) = Self::validate_credentials(credentials) {
            return e.into();
        }

        debug!(integration_id = integration.id, "Running TikTok sync");

        let catalog = vec![
            MockCampaign {
                external_id: format!("tt-{}-spark", integration.company_id),
                name: "Spark Ads - UGC".to_string(),
                status: "active",
                daily_budget: 100.0,
            },
            MockCampaign {
                external_id: format!("tt-{}-topview", integration.company_id),
                name: "TopView Awareness".to_string(),
                status: "active",
                daily_budget: 250.0,
            },
        ];

        let profile = MetricProfile {
            impressions: (20_000, 150_000),
            ctr_pct: (0.5, 2.0),
            cpc: (0.2, 1.0),
            lead_rate: (0.02, 0.08),
            deal_value: 400.0,
        };

        match sync_mock_batch(integration, Platform::TiktokAds, catalog, &profile, sink).await {
            Ok(records) => SyncOutcome::completed(records),
            Err(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingSink;
    use serde_json::json;

    #[tokio::test]
    async fn test_connection_accepts_numeric_advertiser_id() {
        let outcome = TiktokConnector::new()
            .test_connection(&json!({
                "access_token": "tok",
                "advertiser_id": "7001234567890",
            }))
            .await;
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_connection_rejects_non_numeric_advertiser_id() {
        let outcome = TiktokConnector::new()
            .test_connection(&json!({
                "access_token": "tok",
                "advertiser_id": "adv-001",
            }))
            .await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("advertiser_id"));
    }

    #[tokio::test]
    async fn test_sync_counts_campaigns_and_metrics() {
        let sink = RecordingSink::new();
        let integration = crate::test_support::integration_fixture("tiktok_ads");

        let outcome = TiktokConnector::new()
            .sync(
                &integration,
                &json!({"access_token": "tok", "advertiser_id": "123"}),
                &sink,
            )
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.records_processed, 2 + 2 * 7);
    }
}
