//! Back-office handlers against a migrated `PostgreSQL`.
//!
//! Each test gets a fresh database from the sqlx test harness
//! (`DATABASE_URL` must point at a server that allows creating databases).

#![allow(clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use url::Url;

use favobliss_admin::config::{AdminConfig, MediaConfig};
use favobliss_admin::services::auth::AdminAuthService;
use favobliss_admin::state::AppState;
use favobliss_core::Email;

const ADMIN_EMAIL: &str = "ops@favobliss.test";
const ADMIN_PASSWORD: &str = "correct horse battery";

fn test_app(pool: PgPool) -> Router {
    let config = AdminConfig {
        database_url: SecretString::from("postgres://unused/favobliss_test"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3001,
        base_url: "http://localhost:3001".to_owned(),
        session_secret: SecretString::from("k3J9mQ2xW7vL4nR8pT1yB6cF0hD5gA3s"),
        media: MediaConfig {
            api_url: Url::parse("http://127.0.0.1:1/v1_1").unwrap(),
            cloud_name: "favobliss".to_owned(),
            api_key: "000000000000000".to_owned(),
            api_secret: SecretString::from("test-media-secret"),
        },
        json_logs: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };
    let state = AppState::new(config, pool).unwrap();
    favobliss_admin::app(state, SessionManagerLayer::new(MemoryStore::default()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

fn json_request(method: &str, uri: &str, cookie: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Seed a store with two categories; `c-shoes` has a product.
async fn seed(pool: &PgPool) {
    sqlx::query("INSERT INTO store (id, name) VALUES ('s1', 'Favobliss')")
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(
        r"
        INSERT INTO category (id, store_id, name, slug, banner_image) VALUES
            ('c-shoes', 's1', 'Shoes', 'shoes', 'https://img.test/shoes.png'),
            ('c-bags', 's1', 'Bags', 'bags', 'https://img.test/bags.png')
        ",
    )
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO product (id, store_id, category_id, name) VALUES ('p1', 's1', 'c-shoes', 'Runner')",
    )
    .execute(pool)
    .await
    .unwrap();
}

/// Create an admin, log in, and return the session cookie pair.
async fn login(app: &Router, pool: &PgPool) -> String {
    AdminAuthService::new(pool)
        .create_admin(&Email::parse(ADMIN_EMAIL).unwrap(), "Ops", ADMIN_PASSWORD)
        .await
        .unwrap();

    let request = Request::post("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}).to_string(),
        ))
        .unwrap();
    let (status, headers, _) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);

    let set_cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_owned()
}

fn category_body(slug: &str) -> Value {
    json!({
        "name": "Totes",
        "slug": slug,
        "bannerImage": "https://img.test/totes.png"
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_category_unknown_store(pool: PgPool) {
    seed(&pool).await;
    let app = test_app(pool.clone());
    let cookie = login(&app, &pool).await;

    let request = json_request(
        "PATCH",
        "/api/admin/no-such-store/categories/c-bags",
        &cookie,
        &category_body("totes"),
    );
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Store does not exist");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_category_duplicate_slug(pool: PgPool) {
    seed(&pool).await;
    let app = test_app(pool.clone());
    let cookie = login(&app, &pool).await;

    let request = json_request(
        "PATCH",
        "/api/admin/s1/categories/c-bags",
        &cookie,
        &category_body("shoes"),
    );
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Slug already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_category_saves(pool: PgPool) {
    seed(&pool).await;
    let app = test_app(pool.clone());
    let cookie = login(&app, &pool).await;

    let request = json_request(
        "PATCH",
        "/api/admin/s1/categories/c-bags",
        &cookie,
        &category_body("totes"),
    );
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    let category: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(category["slug"], "totes");
    assert_eq!(category["name"], "Totes");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_category_with_products_is_refused(pool: PgPool) {
    seed(&pool).await;
    let app = test_app(pool.clone());
    let cookie = login(&app, &pool).await;

    let request = Request::delete("/api/admin/s1/categories/c-shoes")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        "Cannot delete category with associated products or subcategories"
    );

    let request = Request::delete("/api/admin/s1/categories/c-bags")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, request).await.0, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_coupon_with_unknown_product_is_bad_request(pool: PgPool) {
    seed(&pool).await;
    let app = test_app(pool.clone());
    let cookie = login(&app, &pool).await;

    let request = json_request(
        "POST",
        "/api/admin/s1/coupons",
        &cookie,
        &json!({
            "code": "diwali20",
            "value": "20",
            "startDate": "2026-10-01T00:00:00Z",
            "expiryDate": "2026-11-01T00:00:00Z",
            "productIds": ["p1", "ghost"]
        }),
    );
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid data provided");

    let coupons: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM coupon")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(coupons, 0);
}
