use adpulse_core::ServiceResult;
use adpulse_entities::integration_configs;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Supported advertising/analytics platforms. Closed set: adding a platform
/// means adding a connector and a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    GoogleAds,
    FacebookAds,
    InstagramAds,
    TiktokAds,
    Analytics,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::GoogleAds => write!(f, "google_ads"),
            Platform::FacebookAds => write!(f, "facebook_ads"),
            Platform::InstagramAds => write!(f, "instagram_ads"),
            Platform::TiktokAds => write!(f, "tiktok_ads"),
            Platform::Analytics => write!(f, "analytics"),
        }
    }
}

impl Platform {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "google_ads" => Ok(Platform::GoogleAds),
            "facebook_ads" => Ok(Platform::FacebookAds),
            "instagram_ads" => Ok(Platform::InstagramAds),
            "tiktok_ads" => Ok(Platform::TiktokAds),
            "analytics" => Ok(Platform::Analytics),
            _ => Err(anyhow::anyhow!("Invalid platform: {}", s)),
        }
    }

    pub fn get_all() -> Vec<Platform> {
        vec![
            Platform::GoogleAds,
            Platform::FacebookAds,
            Platform::InstagramAds,
            Platform::TiktokAds,
            Platform::Analytics,
        ]
    }
}

/// Connector-level failures. These never cross the connector boundary as
/// errors; they collapse into a failed [`TestOutcome`] or [`SyncOutcome`]
/// so the orchestrator treats all connector failures uniformly.
#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Missing required credential field '{field}'")]
    MissingCredentials { field: String },

    #[error("Credential field '{field}' is invalid: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Sync failed: {0}")]
    Sync(String),
}

/// Result of a connection test
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

impl From<ConnectorError> for TestOutcome {
    fn from(err: ConnectorError) -> Self {
        TestOutcome::failed(err.to_string())
    }
}

/// Result of a sync run as reported by a connector
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SyncOutcome {
    pub success: bool,
    pub records_processed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncOutcome {
    pub fn completed(records_processed: u64) -> Self {
        Self {
            success: true,
            records_processed,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            records_processed: 0,
            error: Some(error.into()),
        }
    }
}

impl From<ConnectorError> for SyncOutcome {
    fn from(err: ConnectorError) -> Self {
        SyncOutcome::failed(err.to_string())
    }
}

/// Campaign row produced by a sync run, keyed by
/// (company, platform, external id) downstream
#[derive(Debug, Clone)]
pub struct CampaignUpsert {
    pub company_id: i32,
    pub integration_id: Option<i32>,
    pub external_id: String,
    pub name: String,
    pub status: String,
    pub platform: Platform,
    pub metadata: serde_json::Value,
}

/// Daily metric row produced by a sync run, keyed by
/// (company, campaign, creative-or-null, date) downstream
#[derive(Debug, Clone)]
pub struct DailyMetricUpsert {
    pub company_id: i32,
    pub campaign_id: i32,
    pub creative_id: Option<String>,
    pub date: NaiveDate,
    pub impressions: i64,
    pub clicks: i64,
    pub cost: f64,
    pub leads: i64,
    pub qualified_leads: i64,
    pub icp_leads: i64,
    pub revenue: f64,
    pub deals_closed: i64,
}

/// Persistence seam connectors push produced rows through. Implemented by
/// the metrics service; mocked in connector tests.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Upserts a campaign mirror row and returns its local id
    async fn upsert_campaign(&self, campaign: CampaignUpsert) -> ServiceResult<i32>;

    /// Upserts one daily metric row on its composite key
    async fn upsert_daily_metric(&self, metric: DailyMetricUpsert) -> ServiceResult<()>;
}

/// Contract implemented once per platform.
///
/// `test_connection` validates credential shape without mutating state; in
/// production deployments it is the place for a live read-only platform
/// call, and the reference connectors keep that boundary by only validating
/// shape. `sync` produces the trailing-window batch through the sink.
/// Neither operation reports failure by returning an error.
#[async_trait]
pub trait Connector: Send + Sync {
    fn platform(&self) -> Platform;

    async fn test_connection(&self, credentials: &serde_json::Value) -> TestOutcome;

    async fn sync(
        &self,
        integration: &integration_configs::Model,
        credentials: &serde_json::Value,
        sink: &dyn MetricsSink,
    ) -> SyncOutcome;
}

/// Returns a required string field, rejecting absent or empty values
pub(crate) fn require_str<'a>(
    credentials: &'a serde_json::Value,
    field: &str,
) -> Result<&'a str, ConnectorError> {
    match credentials.get(field).and_then(|v| v.as_str()) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConnectorError::MissingCredentials {
            field: field.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_round_trip() {
        for platform in Platform::get_all() {
            assert_eq!(Platform::from_str(&platform.to_string()).unwrap(), platform);
        }
    }

    #[test]
    fn test_platform_unknown() {
        assert!(Platform::from_str("myspace_ads").is_err());
    }

    #[test]
    fn test_platform_wire_format() {
        assert_eq!(
            serde_json::to_string(&Platform::GoogleAds).unwrap(),
            "\"google_ads\""
        );
    }

    #[test]
    fn test_require_str_rejects_empty() {
        let creds = serde_json::json!({"access_token": "  "});
        assert!(require_str(&creds, "access_token").is_err());
        assert!(require_str(&creds, "missing").is_err());
    }
}
