//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::media::{MediaClient, MediaError};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    media: MediaClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the media host client cannot be built.
    pub fn new(config: AdminConfig, pool: PgPool) -> Result<Self, MediaError> {
        let media = MediaClient::new(config.media.clone())?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                media,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The database pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The media host client used by the upload proxies.
    #[must_use]
    pub fn media(&self) -> &MediaClient {
        &self.inner.media
    }
}
