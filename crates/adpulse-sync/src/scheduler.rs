//! Scheduled sweep over all active companies
//!
//! Companies are processed in fixed-size batches: concurrency inside a batch,
//! a strict barrier between batches. One slow or failing tenant delays at
//! most its own batch and never removes other tenants from the sweep.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use cron::Schedule;
use futures::future::join_all;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::{error, info};

use adpulse_core::{DBDateTime, ServiceError, ServiceResult};
use adpulse_database::DbConnection;
use adpulse_entities::companies;

use crate::orchestrator::CompanySyncer;

/// One tenant failure inside a sweep
#[derive(Debug, Clone)]
pub struct SweepError {
    pub company_id: i32,
    pub error: String,
}

/// Result of one full sweep across all active companies
#[derive(Debug, Clone)]
pub struct SweepSummary {
    /// Companies synced without a company-level error
    pub processed: usize,
    pub errors: Vec<SweepError>,
    pub timestamp: DBDateTime,
}

pub struct BatchScheduler {
    db: Arc<DbConnection>,
    syncer: Arc<dyn CompanySyncer>,
    batch_size: usize,
}

impl BatchScheduler {
    pub fn new(db: Arc<DbConnection>, syncer: Arc<dyn CompanySyncer>, batch_size: usize) -> Self {
        Self {
            db,
            syncer,
            batch_size: batch_size.max(1),
        }
    }

    /// Syncs every active company once and reports per-tenant failures
    pub async fn run_sweep(&self) -> ServiceResult<SweepSummary> {
        let company_ids: Vec<i32> = companies::Entity::find()
            .filter(companies::Column::Active.eq(true))
            .order_by_asc(companies::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?
            .into_iter()
            .map(|company| company.id)
            .collect();

        info!(
            companies = company_ids.len(),
            batch_size = self.batch_size,
            "Starting sync sweep"
        );

        let mut processed = 0;
        let mut errors = Vec::new();

        for batch in company_ids.chunks(self.batch_size) {
            let results = join_all(batch.iter().map(|&id| self.syncer.sync_company(id))).await;

            for (&company_id, result) in batch.iter().zip(results) {
                match result {
                    Ok(_) => processed += 1,
                    Err(e) => {
                        error!(company_id, "Company sweep failed: {}", e);
                        errors.push(SweepError {
                            company_id,
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        let summary = SweepSummary {
            processed,
            errors,
            timestamp: Utc::now(),
        };

        info!(
            processed = summary.processed,
            errors = summary.errors.len(),
            "Sync sweep finished"
        );

        Ok(summary)
    }

    /// Drives [`run_sweep`](Self::run_sweep) on a cron schedule, forever.
    /// Returns only if the schedule expression is invalid.
    pub async fn run_forever(&self, schedule: &str) -> ServiceResult<()> {
        let schedule = Schedule::from_str(schedule).map_err(|e| ServiceError::Configuration {
            message: format!("Invalid sync schedule: {}", e),
        })?;

        loop {
            let Some(next) = schedule.upcoming(Utc).next() else {
                return Err(ServiceError::Configuration {
                    message: "Sync schedule has no upcoming occurrence".to_string(),
                });
            };

            let wait = (next - Utc::now()).to_std().unwrap_or_default();
            info!(next_run = %next, "Next scheduled sweep");
            tokio::time::sleep(wait).await;

            if let Err(e) = self.run_sweep().await {
                error!("Scheduled sweep failed: {}", e);
            }
        }
    }
}
