use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use adpulse_connectors::{ConnectorRegistry, MetricsSink};
use adpulse_core::plugin::{
    AdpulsePlugin, PluginContext, PluginError, PluginRoutes, ServiceRegistrationContext,
};
use adpulse_core::{CredentialCipher, ServerConfig};
use adpulse_metrics::DailyMetricsService;
use utoipa::openapi::OpenApi;
use utoipa::OpenApi as OpenApiTrait;

use crate::handlers::{self, AppState, SyncApiDoc};
use crate::orchestrator::{CompanySyncer, SyncOrchestrator};
use crate::scheduler::BatchScheduler;

/// Plugin wiring the orchestrator, scheduler and sync routes
pub struct SyncPlugin;

impl SyncPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SyncPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl AdpulsePlugin for SyncPlugin {
    fn name(&self) -> &'static str {
        "sync"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let db = context.require_service::<adpulse_database::DbConnection>();
            let cipher = context.require_service::<CredentialCipher>();
            let registry = context.require_service::<ConnectorRegistry>();
            let config = context.require_service::<ServerConfig>();

            let sink: Arc<dyn MetricsSink> = Arc::new(DailyMetricsService::new(db.clone()));

            let orchestrator = Arc::new(SyncOrchestrator::new(
                db.clone(),
                cipher,
                registry,
                sink,
            ));

            let syncer: Arc<dyn CompanySyncer> = orchestrator.clone();
            let scheduler = Arc::new(BatchScheduler::new(
                db,
                syncer,
                config.sync_batch_size,
            ));

            context.register_service(orchestrator);
            context.register_service(scheduler);

            tracing::debug!("Sync plugin services registered");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let orchestrator = context.require_service::<SyncOrchestrator>();
        let scheduler = context.require_service::<BatchScheduler>();
        let db = context.require_service::<adpulse_database::DbConnection>();
        let config = context.require_service::<ServerConfig>();

        let app_state = Arc::new(AppState {
            orchestrator,
            scheduler,
            db,
            cron_secret: config.cron_secret.clone(),
        });

        Some(PluginRoutes {
            router: handlers::configure_routes().with_state(app_state),
        })
    }

    fn openapi_schema(&self) -> Option<OpenApi> {
        Some(<SyncApiDoc as OpenApiTrait>::openapi())
    }
}
