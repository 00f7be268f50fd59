//! Google Ads connector

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::mock::{sync_mock_batch, MetricProfile, MockCampaign};
use crate::types::{
    require_str, Connector, ConnectorError, MetricsSink, Platform, SyncOutcome, TestOutcome,
};
use adpulse_entities::integration_configs;

pub struct GoogleAdsConnector;

impl GoogleAdsConnector {
    pub fn new() -> Self {
        Self
    }

    fn validate_credentials(credentials: &Value) -> Result<(), ConnectorError> {
        let customer_id = require_str(credentials, "customer_id")?;
        if customer_id.len() != 10 || !customer_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConnectorError::InvalidFormat {
                field: "customer_id".to_string(),
                reason: "must be a 10-digit customer id without dashes".to_string(),
            });
        }

        require_str(credentials, "developer_token")?;
        require_str(credentials, "client_id")?;
        require_str(credentials, "client_secret")?;
        require_str(credentials, "refresh_token")?;

        Ok(())
    }
}

impl Default for GoogleAdsConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for GoogleAdsConnector {
    fn platform(&self) -> Platform {
        Platform::GoogleAds
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

        debug!(integration_id = integration.id, "Running Google Ads sync");

        let catalog = vec![
            MockCampaign {
                external_id: format!("gads-{}-search", integration.company_id),
                name: "Search - Brand".to_string(),
                status: "active",
                daily_budget: 150.0,
            },
            MockCampaign {
                external_id: format!("gads-{}-pmax", integration.company_id),
                name: "Performance Max".to_string(),
                status: "active",
                daily_budget: 300.0,
            },
            MockCampaign {
                external_id: format!("gads-{}-display", integration.company_id),
                name: "Display Retargeting".to_string(),
                status: "paused",
                daily_budget: 80.0,
            },
        ];

        let profile = MetricProfile {
            impressions: (5_000, 40_000),
            ctr_pct: (1.5, 6.0),
            cpc: (0.8, 3.5),
            lead_rate: (0.03, 0.12),
            deal_value: 1_200.0,
        };

        match sync_mock_batch(integration, Platform::GoogleAds, catalog, &profile, sink).await {
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

    fn valid_credentials() -> Value {
        json!({
            "customer_id": "1234567890",
            "developer_token": "dev-token",
            "client_id": "client",
            "client_secret": "secret",
            "refresh_token": "refresh",
        })
    }

    #[tokio::test]
    async fn test_connection_accepts_valid_credentials() {
        let outcome = GoogleAdsConnector::new()
            .test_connection(&valid_credentials())
            .await;
        assert!(outcome.success, "{:?}", outcome.error);
    }

    #[tokio::test]
    async fn test_connection_rejects_short_customer_id() {
        let mut creds = valid_credentials();
        creds["customer_id"] = json!("12345");

        let outcome = GoogleAdsConnector::new().test_connection(&creds).await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("customer_id"));
    }

    #[tokio::test]
    async fn test_connection_rejects_non_numeric_customer_id() {
        let mut creds = valid_credentials();
        creds["customer_id"] = json!("12345abcde");

        let outcome = GoogleAdsConnector::new().test_connection(&creds).await;
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn test_connection_reports_missing_field() {
        let mut creds = valid_credentials();
        creds.as_object_mut().unwrap().remove("developer_token");

        let outcome = GoogleAdsConnector::new().test_connection(&creds).await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("developer_token"));
    }

    #[tokio::test]
    async fn test_sync_produces_seven_day_batch() {
        let sink = RecordingSink::new();
        let integration = crate::test_support::integration_fixture("google_ads");

        let outcome = GoogleAdsConnector::new()
            .sync(&integration, &valid_credentials(), &sink)
            .await;

        assert!(outcome.success);
        // 3 campaigns plus 7 metric rows each
        assert_eq!(outcome.records_processed, 3 + 3 * 7);
        assert_eq!(sink.campaigns().len(), 3);
        assert_eq!(sink.metrics().len(), 21);
        assert!(sink.metrics().iter().all(|m| m.creative_id.is_none()));
    }

    #[tokio::test]
    async fn test_sync_with_bad_credentials_fails_without_writes() {
        let sink = RecordingSink::new();
        let integration = crate::test_support::integration_fixture("google_ads");

        let outcome = GoogleAdsConnector::new()
            .sync(&integration, &json!({}), &sink)
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.records_processed, 0);
        assert!(sink.campaigns().is_empty());
    }
}
