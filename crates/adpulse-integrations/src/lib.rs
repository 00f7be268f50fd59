//! Integration management: connection testing, encrypted credential storage,
//! CRUD over platform integrations

pub mod handlers;
mod plugin;
mod service;
pub mod types;

pub use plugin::IntegrationsPlugin;
pub use service::IntegrationService;
pub use types::{CreateIntegrationRequest, IntegrationInfo, TestConnectionRequest};
