//! Facebook Ads connector
//!
//! Also serves the Instagram platform type: same credential shape, same API
//! surface, so the registry maps both platforms to this connector. Campaign
//! rows still carry the integration's own platform.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::mock::{sync_mock_batch, MetricProfile, MockCampaign};
use crate::types::{
    require_str, Connector, ConnectorError, MetricsSink, Platform, SyncOutcome, TestOutcome,
};
use adpulse_entities::integration_configs;

pub struct FacebookConnector;

impl FacebookConnector {
    pub fn new() -> Self {
        Self
    }

    fn validate_credentials(credentials: &Value) -> Result<(), ConnectorError> {
        require_str(credentials, "access_token")?;

        let ad_account_id = require_str(credentials, "ad_account_id")?;
        let digits = ad_account_id.strip_prefix("act_");
        match digits {
            Some(rest) if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) => Ok(()),
            _ => Err(ConnectorError::InvalidFormat {
                field: "ad_account_id".to_string(),
                reason: "must look like act_<numeric id>".to_string(),
            }),
        }
    }
}

impl Default for FacebookConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for FacebookConnector {
    fn platform(&self) -> Platform {
        Platform::FacebookAds
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

        // Instagram integrations reuse this connector; keep their campaigns
        // tagged with their own platform.
        let platform = Platform::from_str(&integration.platform)
            .unwrap_or(Platform::FacebookAds);

        debug!(
            integration_id = integration.id,
            %platform,
            "Running Meta sync"
        );

        let prefix = match platform {
            Platform::InstagramAds => "ig",
            _ => "fb",
        };

        let catalog = vec![
            MockCampaign {
                external_id: format!("{}-{}-prospecting", prefix, integration.company_id),
                name: "Prospecting - Lookalike".to_string(),
                status: "active",
                daily_budget: 200.0,
            },
            MockCampaign {
                external_id: format!("{}-{}-retargeting", prefix, integration.company_id),
                name: "Retargeting - Site Visitors".to_string(),
                status: "active",
                daily_budget: 120.0,
            },
            MockCampaign {
                external_id: format!("{}-{}-leadgen", prefix, integration.company_id),
                name: "Lead Forms".to_string(),
                status: "active",
                daily_budget: 90.0,
            },
        ];

        let profile = MetricProfile {
            impressions: (10_000, 80_000),
            ctr_pct: (0.8, 3.0),
            cpc: (0.4, 1.8),
            lead_rate: (0.05, 0.15),
            deal_value: 850.0,
        };

        match sync_mock_batch(integration, platform, catalog, &profile, sink).await {
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
            "access_token": "EAAB-token",
            "ad_account_id": "act_1234567890",
        })
    }

    #[tokio::test]
    async fn test_connection_accepts_valid_credentials() {
        let outcome = FacebookConnector::new()
            .test_connection(&valid_credentials())
            .await;
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_connection_rejects_unprefixed_account_id() {
        let mut creds = valid_credentials();
        creds["ad_account_id"] = json!("1234567890");

        let outcome = FacebookConnector::new().test_connection(&creds).await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("ad_account_id"));
    }

    #[tokio::test]
    async fn test_connection_rejects_missing_token() {
        let outcome = FacebookConnector::new()
            .test_connection(&json!({"ad_account_id": "act_123"}))
            .await;
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn test_sync_tags_instagram_campaigns_with_instagram() {
        let sink = RecordingSink::new();
        let integration = crate::test_support::integration_fixture("instagram_ads");

        let outcome = FacebookConnector::new()
            .sync(&integration, &valid_credentials(), &sink)
            .await;

        assert!(outcome.success);
        assert!(sink
            .campaigns()
            .iter()
            .all(|c| c.platform == Platform::InstagramAds));
        assert!(sink.campaigns()[0].external_id.starts_with("ig-"));
    }
}
