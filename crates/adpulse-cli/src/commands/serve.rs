//! `serve` command: composition root for the API server and sync scheduler

use std::sync::Arc;

use axum::{routing::get, Json};
use clap::Args;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use adpulse_connectors::ConnectorRegistry;
use adpulse_core::plugin::PluginManager;
use adpulse_core::{CredentialCipher, ServerConfig};
use adpulse_integrations::IntegrationsPlugin;
use adpulse_sync::{BatchScheduler, SyncPlugin};

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1:3000", env = "ADPULSE_ADDRESS")]
    pub address: String,

    /// Database connection URL
    #[arg(long, env = "ADPULSE_DATABASE_URL")]
    pub database_url: String,
}

impl ServeCommand {
    pub async fn execute(self) -> anyhow::Result<()> {
        let config = ServerConfig::new(self.address.clone(), self.database_url.clone())?;
        let cipher = Arc::new(CredentialCipher::new(&config.encryption_key)?);

        debug!("Initializing database connection");
        let db = adpulse_database::establish_connection(&self.database_url).await?;

        let registry = Arc::new(ConnectorRegistry::with_default_connectors());

        let mut plugin_manager = PluginManager::new();
        {
            let context = plugin_manager.context();
            context.register_service(db.clone());
            context.register_service(Arc::new(config.clone()));
            context.register_service(cipher);
            context.register_service(registry);
        }

        plugin_manager.register_plugin(Box::new(IntegrationsPlugin::new()));
        plugin_manager.register_plugin(Box::new(SyncPlugin::new()));

        debug!("Initializing plugins");
        plugin_manager.initialize_plugins().await?;

        // The scheduler sweeps on its own cron cadence for deployments where
        // no external scheduler hits /api/sync/cron
        let scheduler = plugin_manager
            .context()
            .require_service::<BatchScheduler>();
        let schedule = config.sync_schedule.clone();
        tokio::spawn(async move {
            info!(schedule = %schedule, "Starting sync scheduler");
            if let Err(e) = scheduler.run_forever(&schedule).await {
                error!("Sync scheduler stopped: {}", e);
            }
        });

        let openapi = plugin_manager.build_unified_openapi();
        let app = plugin_manager
            .build_application()?
            .route(
                "/api-docs/openapi.json",
                get(move || async move { Json(openapi) }),
            )
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        let listener = tokio::net::TcpListener::bind(&config.address).await?;
        info!("Adpulse API listening on {}", config.address);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server exited");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
