//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::store_api::{StoreApiError, StoreClient};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the store API
/// client (which owns the HTTP connection pool and the reference data cache).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: StoreClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the store API client cannot be built from the
    /// configured URL.
    pub fn new(config: StorefrontConfig) -> Result<Self, StoreApiError> {
        let store = StoreClient::new(&config.store_api)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, store }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the store API client.
    #[must_use]
    pub fn store(&self) -> &StoreClient {
        &self.inner.store
    }
}
