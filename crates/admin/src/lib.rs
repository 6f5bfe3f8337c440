//! Favobliss back-office library.
//!
//! JSON handlers that write the catalog (categories, location groups,
//! coupons) to `PostgreSQL`, signed upload proxies to the media host, and
//! email/password admin sessions.
//!
//! # Security
//!
//! Every write requires a logged-in admin. Sessions live in `admin.session`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod media;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use state::AppState;

/// Build the back-office router.
///
/// The session store is a parameter so tests can run against an in-memory
/// store; the binary passes the `PostgreSQL` one from
/// [`middleware::create_session_layer`].
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Database not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;
    use url::Url;

    use super::*;
    use crate::config::{AdminConfig, MediaConfig};

    fn test_app() -> Router {
        let config = AdminConfig {
            database_url: SecretString::from("postgres://localhost:1/favobliss_test"),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3001,
            base_url: "http://localhost:3001".to_owned(),
            session_secret: SecretString::from("k3J9mQ2xW7vL4nR8pT1yB6cF0hD5gA3s"),
            media: MediaConfig {
                api_url: Url::parse("http://127.0.0.1:1/v1_1").unwrap(),
                cloud_name: "favobliss".to_owned(),
                api_key: "key".to_owned(),
                api_secret: SecretString::from("secret"),
            },
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        // Never connects unless a handler reaches the database.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/favobliss_test")
            .unwrap();
        let state = AppState::new(config, pool).unwrap();
        app(state, SessionManagerLayer::new(MemoryStore::default()))
    }

    async fn send(request: Request<Body>) -> (StatusCode, String) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        assert_eq!(send(request).await, (StatusCode::OK, "ok".to_owned()));
    }

    #[tokio::test]
    async fn test_me_requires_session() {
        let request = Request::get("/api/auth/me").body(Body::empty()).unwrap();
        assert_eq!(
            send(request).await,
            (StatusCode::UNAUTHORIZED, "Unauthorized Access".to_owned())
        );
    }

    #[tokio::test]
    async fn test_invalid_body_is_checked_before_session() {
        let request = json_request(
            "PATCH",
            "/api/admin/s1/categories/c1",
            r#"{"name": "", "slug": "shoes"}"#,
        );
        assert_eq!(
            send(request).await,
            (StatusCode::BAD_REQUEST, "Invalid data provided".to_owned())
        );
    }

    #[tokio::test]
    async fn test_valid_body_without_session_is_unauthorized() {
        let request = json_request(
            "PATCH",
            "/api/admin/s1/categories/c1",
            r#"{"name": "Shoes", "slug": "shoes", "bannerImage": "https://img/b.png"}"#,
        );
        assert_eq!(
            send(request).await,
            (StatusCode::UNAUTHORIZED, "Unauthorized Access".to_owned())
        );
    }

    #[tokio::test]
    async fn test_delete_without_session_is_unauthorized() {
        let request = Request::delete("/api/admin/s1/coupons/k1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(request).await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_upload_without_session_is_unauthorized() {
        let request = Request::post("/api/upload-image")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=X")
            .body(Body::from("--X--\r\n"))
            .unwrap();
        assert_eq!(send(request).await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_body() {
        let request = json_request("POST", "/api/auth/login", r#"{"email": "nope"}"#);
        assert_eq!(
            send(request).await,
            (StatusCode::BAD_REQUEST, "Invalid data provided".to_owned())
        );
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let request = Request::post("/api/auth/logout").body(Body::empty()).unwrap();
        assert_eq!(send(request).await.0, StatusCode::NO_CONTENT);
    }
}
