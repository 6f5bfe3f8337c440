//! Coupon API handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use tower_sessions::Session;
use tracing::instrument;

use favobliss_core::{Coupon, CouponId};

use super::{ensure_store, require_id, require_store_id, validated};
use crate::db::{CouponRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::forms::CouponForm;
use crate::middleware::{RequireAdminAuth, require_admin};
use crate::state::AppState;

const COUPON_ID_REQUIRED: &str = "Coupon Id is required";
const COUPON_NOT_FOUND: &str = "Coupon not found";

fn write_error(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::Conflict(_) => AppError::BadRequest("Coupon code already exists"),
        RepositoryError::InvalidReference(_) => AppError::BadRequest("Invalid data provided"),
        RepositoryError::NotFound => AppError::NotFound(COUPON_NOT_FOUND),
        other => AppError::Database(other),
    }
}

/// List a store's coupons.
#[instrument(skip(state, _admin))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<Coupon>>> {
    let store_id = require_store_id(store_id)?;
    let coupons = CouponRepository::new(state.pool()).list(&store_id).await?;
    Ok(Json(coupons))
}

/// Create a coupon.
#[instrument(skip(state, session, body))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<String>,
    body: Bytes,
) -> Result<Json<Coupon>> {
    let input = validated::<CouponForm>(&body)?;
    let admin = require_admin(&session).await?;
    let store_id = require_store_id(store_id)?;
    ensure_store(&state, &store_id).await?;

    let coupon = CouponRepository::new(state.pool())
        .create(&store_id, &input)
        .await
        .map_err(write_error)?;

    tracing::info!(admin = %admin.id, coupon = %coupon.id, code = %coupon.code, "Created coupon");
    Ok(Json(coupon))
}

/// Get one coupon.
#[instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path((store_id, coupon_id)): Path<(String, String)>,
) -> Result<Json<Coupon>> {
    let store_id = require_store_id(store_id)?;
    let coupon_id: CouponId = require_id(coupon_id, COUPON_ID_REQUIRED)?;

    CouponRepository::new(state.pool())
        .get(&store_id, &coupon_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(COUPON_NOT_FOUND))
}

/// Update a coupon.
#[instrument(skip(state, session, body))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path((store_id, coupon_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Coupon>> {
    let input = validated::<CouponForm>(&body)?;
    let admin = require_admin(&session).await?;
    let store_id = require_store_id(store_id)?;
    let coupon_id: CouponId = require_id(coupon_id, COUPON_ID_REQUIRED)?;
    ensure_store(&state, &store_id).await?;

    let coupon = CouponRepository::new(state.pool())
        .update(&store_id, &coupon_id, &input)
        .await
        .map_err(write_error)?;

    tracing::info!(admin = %admin.id, coupon = %coupon.id, "Updated coupon");
    Ok(Json(coupon))
}

/// Delete a coupon no order has used.
#[instrument(skip(state, session))]
pub async fn destroy(
    State(state): State<AppState>,
    session: Session,
    Path((store_id, coupon_id)): Path<(String, String)>,
) -> Result<Json<Coupon>> {
    let admin = require_admin(&session).await?;
    let store_id = require_store_id(store_id)?;
    let coupon_id: CouponId = require_id(coupon_id, COUPON_ID_REQUIRED)?;
    ensure_store(&state, &store_id).await?;

    let coupons = CouponRepository::new(state.pool());
    if coupons.has_orders(&coupon_id).await? {
        return Err(AppError::BadRequest(
            "Make sure no orders are using this coupon.",
        ));
    }

    let coupon = coupons
        .delete(&store_id, &coupon_id)
        .await
        .map_err(write_error)?;

    tracing::info!(admin = %admin.id, coupon = %coupon.id, "Deleted coupon");
    Ok(Json(coupon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_code_message() {
        assert_eq!(
            write_error(RepositoryError::Conflict("code".into())).to_string(),
            "Coupon code already exists"
        );
        assert_eq!(
            write_error(RepositoryError::NotFound).to_string(),
            "Coupon not found"
        );
    }

    #[test]
    fn test_unknown_product_is_bad_request() {
        let err = write_error(RepositoryError::InvalidReference(
            "coupon_product_product_id_fkey".into(),
        ));
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid data provided");
    }
}
