use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use adpulse_core::problem::{internal_server_error, not_found, unauthorized};
use adpulse_core::{DBDateTime, Problem};
use adpulse_database::DbConnection;
use adpulse_entities::{companies, integration_configs};

use crate::orchestrator::SyncOrchestrator;
use crate::scheduler::{BatchScheduler, SweepSummary};

pub struct AppState {
    pub orchestrator: Arc<SyncOrchestrator>,
    pub scheduler: Arc<BatchScheduler>,
    pub db: Arc<DbConnection>,
    pub cron_secret: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(trigger_sync, run_cron_sweep),
    components(schemas(TriggerSyncRequest, TriggerSyncResponse, CronSweepResponse)),
    tags((name = "Sync", description = "Sync orchestration"))
)]
pub struct SyncApiDoc;

pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sync/trigger", post(trigger_sync))
        .route("/sync/cron", post(run_cron_sweep))
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TriggerSyncRequest {
    pub company_id: i32,
    /// Restrict the run to a single integration
    pub integration_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TriggerSyncResponse {
    /// Correlates log lines of the spawned run; completion is observed by
    /// polling integration status
    pub ticket: Uuid,
    pub status: String,
}

/// Kick off a sync in the background
///
/// Returns as soon as the work is spawned; 202 means "initiated", not
/// "completed".
#[utoipa::path(
    post,
    path = "/sync/trigger",
    tag = "Sync",
    request_body = TriggerSyncRequest,
    responses(
        (status = 202, description = "Sync initiated", body = TriggerSyncResponse),
        (status = 404, description = "Company or integration not found")
    )
)]
async fn trigger_sync(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TriggerSyncRequest>,
) -> Result<impl IntoResponse, Problem> {
    let ticket = Uuid::new_v4();

    match request.integration_id {
        Some(integration_id) => {
            let integration = integration_configs::Entity::find_by_id(integration_id)
                .one(state.db.as_ref())
                .await
                .map_err(|e| internal_server_error(e.to_string()))?
                .filter(|integration| integration.company_id == request.company_id)
                .ok_or_else(|| {
                    not_found(format!(
                        "Integration {} for company {}",
                        integration_id, request.company_id
                    ))
                })?;

            let orchestrator = state.orchestrator.clone();
            tokio::spawn(async move {
                info!(%ticket, integration_id = integration.id, "Manual sync started");
                if let Err(e) = orchestrator.sync_integration(&integration).await {
                    error!(%ticket, "Manual sync failed to record: {}", e);
                }
            });
        }
        None => {
            companies::Entity::find_by_id(request.company_id)
                .one(state.db.as_ref())
                .await
                .map_err(|e| internal_server_error(e.to_string()))?
                .ok_or_else(|| not_found(format!("Company {}", request.company_id)))?;

            let orchestrator = state.orchestrator.clone();
            let company_id = request.company_id;
            tokio::spawn(async move {
                info!(%ticket, company_id, "Manual company sync started");
                if let Err(e) = orchestrator.sync_company_integrations(company_id).await {
                    error!(%ticket, "Manual company sync failed: {}", e);
                }
            });
        }
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(TriggerSyncResponse {
            ticket,
            status: "initiated".to_string(),
        }),
    ))
}

/// Wire shape of a finished sweep; per-company failure details stay in the
/// sweep summary and the logs, the body only carries the count
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CronSweepResponse {
    /// Companies synced without a company-level error
    pub processed: usize,
    /// Companies whose sync failed
    pub errors: usize,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DBDateTime,
}

impl From<SweepSummary> for CronSweepResponse {
    fn from(summary: SweepSummary) -> Self {
        Self {
            processed: summary.processed,
            errors: summary.errors.len(),
            timestamp: summary.timestamp,
        }
    }
}

/// Run a full sweep, authenticated by the cron shared secret
#[utoipa::path(
    post,
    path = "/sync/cron",
    tag = "Sync",
    responses(
        (status = 200, description = "Sweep summary", body = CronSweepResponse),
        (status = 401, description = "Missing or invalid cron secret")
    )
)]
async fn run_cron_sweep(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Problem> {
    let authorized = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == state.cron_secret);

    if !authorized {
        return Err(unauthorized("Invalid cron secret"));
    }

    let summary = state
        .scheduler
        .run_sweep()
        .await
        .map_err(|e| internal_server_error(e.to_string()))?;

    Ok((StatusCode::OK, Json(CronSweepResponse::from(summary))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::SweepError;
    use chrono::Utc;

    #[test]
    fn cron_response_reports_error_count_not_details() {
        let summary = SweepSummary {
            processed: 3,
            errors: vec![
                SweepError {
                    company_id: 4,
                    error: "boom".to_string(),
                },
                SweepError {
                    company_id: 9,
                    error: "bang".to_string(),
                },
            ],
            timestamp: Utc::now(),
        };

        let body = serde_json::to_value(CronSweepResponse::from(summary)).unwrap();

        assert_eq!(body["processed"], 3);
        assert_eq!(body["errors"], 2);
        assert!(body["errors"].is_u64());
        assert!(body["timestamp"].is_string());
    }
}
