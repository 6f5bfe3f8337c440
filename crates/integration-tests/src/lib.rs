//! Integration tests for Favobliss.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p favobliss-integration-tests
//! ```
//!
//! The store backend is replaced by a `wiremock` server and the back-office
//! runs with an in-memory session store and a lazy pool, so none of these
//! tests need a running database.
//!
//! # Test Categories
//!
//! - `store_api` - Store API client behaviour against a mock backend
//! - `storefront_pages` - Page loaders and routes, including fallbacks
//! - `admin_api` - Back-office validation, ordering of checks, and auth

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use url::Url;

use favobliss_admin::config::{AdminConfig, MediaConfig};
use favobliss_core::StoreId;
use favobliss_storefront::config::{HomeConfig, StorefrontConfig};
use favobliss_storefront::store_api::{StoreApiConfig, StoreClient};

/// Store id every mock expects in its paths.
pub const STORE_ID: &str = "store-1";

/// Path prefix of the store API for [`STORE_ID`].
#[must_use]
pub fn api_path(rest: &str) -> String {
    format!("/api/admin/{STORE_ID}/{rest}")
}

/// Store API settings pointing at `base_url`.
#[must_use]
pub fn store_api_config(base_url: &str) -> StoreApiConfig {
    StoreApiConfig {
        base_url: Url::parse(base_url).unwrap(),
        store_id: StoreId::new(STORE_ID),
        cache_ttl: Duration::from_secs(60),
        timeout: Duration::from_secs(2),
    }
}

/// A store client for a mock backend.
#[must_use]
pub fn store_client(base_url: &str) -> StoreClient {
    StoreClient::new(&store_api_config(base_url)).unwrap()
}

/// The storefront router backed by a mock store API.
#[must_use]
pub fn storefront_app(base_url: &str) -> Router {
    let config = StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        base_url: "http://localhost:3000".to_owned(),
        store_api: store_api_config(base_url),
        home: HomeConfig::default(),
        json_logs: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };
    let state = favobliss_storefront::state::AppState::new(config).unwrap();
    favobliss_storefront::app(state)
}

/// The back-office router with an in-memory session store.
///
/// The pool connects lazily to an address nothing listens on, so a test that
/// reaches the database gets a 500.
#[must_use]
pub fn admin_app(media_url: &str) -> Router {
    let config = AdminConfig {
        database_url: SecretString::from("postgres://localhost:1/favobliss_test"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3001,
        base_url: "http://localhost:3001".to_owned(),
        session_secret: SecretString::from("k3J9mQ2xW7vL4nR8pT1yB6cF0hD5gA3s"),
        media: MediaConfig {
            api_url: Url::parse(media_url).unwrap(),
            cloud_name: "favobliss".to_owned(),
            api_key: "000000000000000".to_owned(),
            api_secret: SecretString::from("media-secret"),
        },
        json_logs: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://localhost:1/favobliss_test")
        .unwrap();
    let state = favobliss_admin::state::AppState::new(config, pool).unwrap();
    favobliss_admin::app(state, SessionManagerLayer::new(MemoryStore::default()))
}

/// Send one request and collect status, headers and body text.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}
