//! Platform connectors for the Adpulse sync subsystem
//!
//! One connector per advertising platform, all behind the [`Connector`]
//! contract: shape-validate credentials, produce a trailing-window batch of
//! campaigns and daily metrics through a [`MetricsSink`]. The reference
//! connectors fabricate data instead of calling platform APIs; swapping in a
//! live implementation does not change the contract.

pub mod analytics;
pub mod facebook;
pub mod google_ads;
mod mock;
pub mod registry;
pub mod tiktok;
pub mod types;

pub use analytics::AnalyticsConnector;
pub use facebook::FacebookConnector;
pub use google_ads::GoogleAdsConnector;
pub use mock::SYNC_WINDOW_DAYS;
pub use registry::{ConnectorRegistry, RegistryError};
pub use tiktok::TiktokConnector;
pub use types::{
    CampaignUpsert, Connector, ConnectorError, DailyMetricUpsert, MetricsSink, Platform,
    SyncOutcome, TestOutcome,
};
