//! JSON API handlers.
//!
//! Store-scoped handlers check, in order: the body, the session, the path ids,
//! and that the store exists. Each failure has a fixed plain-text message.

pub mod auth;
pub mod categories;
pub mod coupons;
pub mod location_groups;
pub mod stores;
pub mod uploads;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use serde::de::DeserializeOwned;

use favobliss_core::StoreId;

use crate::db::StoreRepository;
use crate::error::{AppError, Result};
use crate::forms::{self, Validate};
use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/stores", get(stores::list))
        .route(
            "/api/admin/{store_id}/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/admin/{store_id}/categories/{category_id}",
            get(categories::show)
                .patch(categories::update)
                .delete(categories::destroy),
        )
        .route(
            "/api/admin/{store_id}/location-group",
            get(location_groups::list).post(location_groups::create),
        )
        .route(
            "/api/admin/{store_id}/location-group/{group_id}",
            get(location_groups::show)
                .patch(location_groups::update)
                .delete(location_groups::destroy),
        )
        .route(
            "/api/admin/{store_id}/coupons",
            get(coupons::list).post(coupons::create),
        )
        .route(
            "/api/admin/{store_id}/coupons/{coupon_id}",
            get(coupons::show)
                .patch(coupons::update)
                .delete(coupons::destroy),
        )
        .route(
            "/api/upload-image",
            post(uploads::upload_image).layer(DefaultBodyLimit::max(uploads::IMAGE_BODY_LIMIT)),
        )
        .route(
            "/api/upload-video",
            post(uploads::upload_video).layer(DefaultBodyLimit::max(uploads::VIDEO_BODY_LIMIT)),
        )
}

/// Parse and validate a JSON body; any failure is `Invalid data provided`.
pub(crate) fn validated<F>(body: &[u8]) -> Result<F::Output>
where
    F: DeserializeOwned + Validate,
{
    forms::parse_json::<F>(body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body");
        AppError::BadRequest("Invalid data provided")
    })
}

/// A non-blank path id.
pub(crate) fn require_id<T: From<String>>(raw: String, message: &'static str) -> Result<T> {
    if raw.trim().is_empty() {
        return Err(AppError::BadRequest(message));
    }
    Ok(T::from(raw))
}

/// The store id from the path.
pub(crate) fn require_store_id(raw: String) -> Result<StoreId> {
    require_id(raw, "Store Id is required")
}

/// Fail with `Store does not exist` unless the store is known.
pub(crate) async fn ensure_store(state: &AppState, store_id: &StoreId) -> Result<()> {
    if StoreRepository::new(state.pool()).exists(store_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("Store does not exist"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use favobliss_core::CategoryId;

    use super::*;
    use crate::forms::CategoryForm;

    #[test]
    fn test_require_id() {
        let id: CategoryId = require_id("c1".to_owned(), "Category Id is required").unwrap();
        assert_eq!(id.as_str(), "c1");

        let err = require_id::<CategoryId>("  ".to_owned(), "Category Id is required").unwrap_err();
        assert_eq!(err.to_string(), "Category Id is required");
    }

    #[test]
    fn test_validated_hides_field_errors() {
        let err = validated::<CategoryForm>(br#"{"name": ""}"#).unwrap_err();
        assert_eq!(err.to_string(), "Invalid data provided");
    }
}
