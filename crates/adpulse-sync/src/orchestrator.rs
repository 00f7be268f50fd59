//! Per-integration sync orchestration
//!
//! Every invocation writes one `started` sync log, flips the integration to
//! `in_progress`, then finalizes exactly one terminal log state and one
//! status update, whether the run succeeds or fails. Concurrent runs against
//! the same integration are not serialized; the status fields reflect
//! whichever run finalized last.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use tracing::{error, info, warn};

use adpulse_connectors::{ConnectorRegistry, MetricsSink, Platform, SyncOutcome};
use adpulse_core::{CredentialCipher, ServiceError, ServiceResult};
use adpulse_database::DbConnection;
use adpulse_entities::{integration_configs, sync_logs, IntegrationSyncStatus, SyncRunStatus};

/// Outcome of syncing every active integration of one company
#[derive(Debug, Clone, Serialize)]
pub struct CompanySyncSummary {
    pub company_id: i32,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub records_processed: u64,
}

/// Seam between the scheduler and the orchestrator
#[async_trait]
pub trait CompanySyncer: Send + Sync {
    async fn sync_company(&self, company_id: i32) -> ServiceResult<CompanySyncSummary>;
}

pub struct SyncOrchestrator {
    db: Arc<DbConnection>,
    cipher: Arc<CredentialCipher>,
    registry: Arc<ConnectorRegistry>,
    sink: Arc<dyn MetricsSink>,
}

impl SyncOrchestrator {
    pub fn new(
        db: Arc<DbConnection>,
        cipher: Arc<CredentialCipher>,
        registry: Arc<ConnectorRegistry>,
        sink: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            db,
            cipher,
            registry,
            sink,
        }
    }

    /// Runs one sync attempt for the integration and records its outcome.
    ///
    /// Credential or connector failures come back as a failed [`SyncOutcome`];
    /// an `Err` return means the run could not be recorded properly (database
    /// failure) or the platform has no registered connector. In the latter
    /// case the failure is recorded before the error propagates.
    pub async fn sync_integration(
        &self,
        integration: &integration_configs::Model,
    ) -> ServiceResult<SyncOutcome> {
        info!(
            integration_id = integration.id,
            company_id = integration.company_id,
            platform = %integration.platform,
            "Starting sync"
        );

        let log = sync_logs::ActiveModel {
            integration_id: Set(integration.id),
            status: Set(SyncRunStatus::Started.as_str().to_string()),
            started_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?;

        self.set_integration_status(integration.id, IntegrationSyncStatus::InProgress, None, false)
            .await?;

        let credentials: serde_json::Value =
            match self.cipher.decrypt_object(&integration.encrypted_credentials) {
                Ok(value) => value,
                Err(e) => {
                    let outcome =
                        SyncOutcome::failed(format!("Failed to decrypt credentials: {}", e));
                    self.finalize(log.id, integration.id, &outcome).await?;
                    return Ok(outcome);
                }
            };

        let platform = match Platform::from_str(&integration.platform) {
            Ok(platform) => platform,
            Err(e) => {
                let outcome = SyncOutcome::failed(e.to_string());
                self.finalize(log.id, integration.id, &outcome).await?;
                return Ok(outcome);
            }
        };

        let connector = match self.registry.get(platform) {
            Ok(connector) => connector,
            Err(e) => {
                // Deployment inconsistency: record the failure, then surface it
                let outcome = SyncOutcome::failed(e.to_string());
                self.finalize(log.id, integration.id, &outcome).await?;
                return Err(ServiceError::Configuration {
                    message: e.to_string(),
                });
            }
        };

        let outcome = connector
            .sync(integration, &credentials, self.sink.as_ref())
            .await;

        self.finalize(log.id, integration.id, &outcome).await?;

        if outcome.success {
            info!(
                integration_id = integration.id,
                records = outcome.records_processed,
                "Sync completed"
            );
        } else {
            warn!(
                integration_id = integration.id,
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "Sync failed"
            );
        }

        Ok(outcome)
    }

    /// Syncs all active integrations of a company concurrently. A failing
    /// integration never aborts its siblings.
    pub async fn sync_company_integrations(
        &self,
        company_id: i32,
    ) -> ServiceResult<CompanySyncSummary> {
        let integrations = integration_configs::Entity::find()
            .filter(integration_configs::Column::CompanyId.eq(company_id))
            .filter(integration_configs::Column::Active.eq(true))
            .order_by_asc(integration_configs::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        let total = integrations.len();
        let results = join_all(
            integrations
                .iter()
                .map(|integration| self.sync_integration(integration)),
        )
        .await;

        let mut succeeded = 0;
        let mut failed = 0;
        let mut records_processed = 0u64;

        for (integration, result) in integrations.iter().zip(results) {
            match result {
                Ok(outcome) if outcome.success => {
                    succeeded += 1;
                    records_processed += outcome.records_processed;
                }
                Ok(_) => failed += 1,
                Err(e) => {
                    failed += 1;
                    error!(
                        integration_id = integration.id,
                        "Sync run not recorded cleanly: {}", e
                    );
                }
            }
        }

        info!(
            company_id,
            total, succeeded, failed, records_processed, "Company sync finished"
        );

        Ok(CompanySyncSummary {
            company_id,
            total,
            succeeded,
            failed,
            records_processed,
        })
    }

    async fn finalize(
        &self,
        log_id: i32,
        integration_id: i32,
        outcome: &SyncOutcome,
    ) -> ServiceResult<()> {
        let mut log = sync_logs::ActiveModel {
            id: Set(log_id),
            completed_at: Set(Some(Utc::now())),
            ..Default::default()
        };

        if outcome.success {
            log.status = Set(SyncRunStatus::Completed.as_str().to_string());
            log.records_processed = Set(Some(outcome.records_processed as i64));
        } else {
            log.status = Set(SyncRunStatus::Failed.as_str().to_string());
            log.error_message = Set(outcome.error.clone());
        }

        log.update(self.db.as_ref())
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        if outcome.success {
            self.set_integration_status(integration_id, IntegrationSyncStatus::Success, None, true)
                .await
        } else {
            self.set_integration_status(
                integration_id,
                IntegrationSyncStatus::Failed,
                outcome.error.clone(),
                false,
            )
            .await
        }
    }

    async fn set_integration_status(
        &self,
        integration_id: i32,
        status: IntegrationSyncStatus,
        error: Option<String>,
        touch_last_sync: bool,
    ) -> ServiceResult<()> {
        let mut model = integration_configs::ActiveModel {
            id: Set(integration_id),
            last_sync_status: Set(Some(status.as_str().to_string())),
            last_sync_error: Set(error),
            ..Default::default()
        };

        if touch_last_sync {
            model.last_sync_at = Set(Some(Utc::now()));
        }

        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl CompanySyncer for SyncOrchestrator {
    async fn sync_company(&self, company_id: i32) -> ServiceResult<CompanySyncSummary> {
        self.sync_company_integrations(company_id).await
    }
}
