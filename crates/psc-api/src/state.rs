//! # Application State
//!
//! Shared state for the Axum application. Wires the four domain
//! components together the way the core expects: the connection engine
//! observes the version store so re-validation runs synchronously
//! inside the transition that killed a version.

use std::sync::Arc;
use std::time::Duration;

use psc_connections::ConnectionConsistencyEngine;
use psc_store::EntityVersionStore;
use psc_translation::{
    HttpVendorClient, TranslationOrderCoordinator, VendorConfig, VendorError,
};

/// Configuration for the application state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the translation vendor API.
    pub vendor_url: String,
    /// Bearer token for the vendor API.
    pub vendor_api_key: String,
    /// Vendor dispatch timeout in seconds.
    pub vendor_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            vendor_url: "http://127.0.0.1:9470/vendor".to_string(),
            vendor_api_key: String::new(),
            vendor_timeout_secs: 30,
        }
    }
}

/// Shared application state passed to all route handlers.
///
/// Cheaply cloneable — all clones share the same components.
#[derive(Clone)]
pub struct AppState {
    /// The entity version store.
    pub store: Arc<EntityVersionStore>,
    /// The connection consistency engine, observing the store.
    pub connections: Arc<ConnectionConsistencyEngine>,
    /// The translation order coordinator.
    pub translations: Arc<TranslationOrderCoordinator<HttpVendorClient>>,
}

impl AppState {
    /// Assemble the application state from configuration.
    pub fn new(config: AppConfig) -> Result<Self, VendorError> {
        let store = Arc::new(EntityVersionStore::in_memory());
        let connections = Arc::new(ConnectionConsistencyEngine::new(store.clone()));
        store.register_observer(connections.clone());
        let vendor = HttpVendorClient::new(VendorConfig {
            base_url: config.vendor_url,
            api_key: config.vendor_api_key,
            timeout_secs: config.vendor_timeout_secs,
        })?;
        let translations = Arc::new(
            TranslationOrderCoordinator::new(store.clone(), Arc::new(vendor))
                .with_dispatch_timeout(Duration::from_secs(config.vendor_timeout_secs)),
        );
        Ok(Self {
            store,
            connections,
            translations,
        })
    }
}
