//! Closed platform-to-connector mapping
//!
//! Both the test and sync code paths resolve connectors here, so this is the
//! single place that enumerates the supported-platform set.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::analytics::AnalyticsConnector;
use crate::facebook::FacebookConnector;
use crate::google_ads::GoogleAdsConnector;
use crate::tiktok::TiktokConnector;
use crate::types::{Connector, Platform};

/// A recognized platform value with no registered connector is a deployment
/// inconsistency, not a user error; callers may propagate it.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("No connector registered for platform '{0}'")]
    UnsupportedPlatform(Platform),
}

pub struct ConnectorRegistry {
    connectors: HashMap<Platform, Arc<dyn Connector>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self {
            connectors: HashMap::new(),
        }
    }

    /// Builds the registry with all reference connectors. The Facebook
    /// connector serves both the Facebook and Instagram platform types.
    pub fn with_default_connectors() -> Self {
        let mut registry = Self::new();

        registry.register(Platform::GoogleAds, Arc::new(GoogleAdsConnector::new()));

        let facebook: Arc<dyn Connector> = Arc::new(FacebookConnector::new());
        registry.register(Platform::FacebookAds, facebook.clone());
        registry.register(Platform::InstagramAds, facebook);

        registry.register(Platform::TiktokAds, Arc::new(TiktokConnector::new()));
        registry.register(Platform::Analytics, Arc::new(AnalyticsConnector::new()));

        registry
    }

    pub fn register(&mut self, platform: Platform, connector: Arc<dyn Connector>) {
        info!("Registering connector for platform: {}", platform);
        self.connectors.insert(platform, connector);
    }

    pub fn get(&self, platform: Platform) -> Result<Arc<dyn Connector>, RegistryError> {
        self.connectors
            .get(&platform)
            .cloned()
            .ok_or(RegistryError::UnsupportedPlatform(platform))
    }

    pub fn supported_platforms(&self) -> Vec<Platform> {
        let mut platforms: Vec<Platform> = self.connectors.keys().copied().collect();
        platforms.sort_by_key(|p| p.to_string());
        platforms
    }
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        Self::with_default_connectors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_covers_all_platforms() {
        let registry = ConnectorRegistry::with_default_connectors();
        for platform in Platform::get_all() {
            assert!(registry.get(platform).is_ok(), "missing {}", platform);
        }
    }

    #[test]
    fn test_instagram_resolves_to_facebook_connector() {
        let registry = ConnectorRegistry::with_default_connectors();
        let connector = registry.get(Platform::InstagramAds).unwrap();
        assert_eq!(connector.platform(), Platform::FacebookAds);
    }

    #[test]
    fn test_empty_registry_reports_unsupported_platform() {
        let registry = ConnectorRegistry::new();
        let result = registry.get(Platform::GoogleAds);
        assert!(matches!(
            result,
            Err(RegistryError::UnsupportedPlatform(Platform::GoogleAds))
        ));
    }
}
