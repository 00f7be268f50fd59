//! String-backed status enums stored on integration and sync-log rows

use serde::{Deserialize, Serialize};

/// Lifecycle of a single sync run, recorded on `sync_logs.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncRunStatus {
    Started,
    Completed,
    Failed,
}

impl SyncRunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncRunStatus::Started => "started",
            SyncRunStatus::Completed => "completed",
            SyncRunStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SyncRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Last observed sync state on `integration_configs.last_sync_status`,
/// polled by UIs while a run is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationSyncStatus {
    InProgress,
    Success,
    Failed,
}

impl IntegrationSyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationSyncStatus::InProgress => "in_progress",
            IntegrationSyncStatus::Success => "success",
            IntegrationSyncStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for IntegrationSyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
