//! SeaORM entities for the Adpulse data model
//!
//! `companies` is the tenant root: integrations, campaigns and daily metrics
//! are all scoped by `company_id`, and every query must filter on it.

pub mod campaigns;
pub mod companies;
pub mod daily_metrics;
pub mod integration_configs;
pub mod sync_logs;
pub mod types;

pub use types::{IntegrationSyncStatus, SyncRunStatus};
