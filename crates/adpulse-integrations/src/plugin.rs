use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use adpulse_connectors::ConnectorRegistry;
use adpulse_core::plugin::{
    AdpulsePlugin, PluginContext, PluginError, PluginRoutes, ServiceRegistrationContext,
};
use adpulse_core::CredentialCipher;
use utoipa::openapi::OpenApi;
use utoipa::OpenApi as OpenApiTrait;

use crate::handlers::{self, AppState, IntegrationsApiDoc};
use crate::service::IntegrationService;

/// Plugin wiring the integration service and its routes
pub struct IntegrationsPlugin;

impl IntegrationsPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IntegrationsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl AdpulsePlugin for IntegrationsPlugin {
    fn name(&self) -> &'static str {
        "integrations"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let db = context.require_service::<adpulse_database::DbConnection>();
            let cipher = context.require_service::<CredentialCipher>();
            let registry = context.require_service::<ConnectorRegistry>();

            let integration_service = Arc::new(IntegrationService::new(db, cipher, registry));
            context.register_service(integration_service);

            tracing::debug!("Integrations plugin services registered");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let integration_service = context.require_service::<IntegrationService>();

        let app_state = Arc::new(AppState {
            integration_service,
        });

        Some(PluginRoutes {
            router: handlers::configure_routes().with_state(app_state),
        })
    }

    fn openapi_schema(&self) -> Option<OpenApi> {
        Some(<IntegrationsApiDoc as OpenApiTrait>::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_name() {
        assert_eq!(IntegrationsPlugin::new().name(), "integrations");
    }
}
