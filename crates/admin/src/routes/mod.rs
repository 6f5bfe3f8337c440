//! HTTP route handlers for the back-office.
//!
//! # Route Structure
//!
//! ```text
//! POST   /api/auth/login                                   - Email/password login
//! POST   /api/auth/logout                                  - End the session
//! GET    /api/auth/me                                      - The logged-in admin
//!
//! GET    /api/stores                                       - Stores
//!
//! GET    /api/admin/{store_id}/categories                  - List categories
//! POST   /api/admin/{store_id}/categories                  - Create category
//! GET    /api/admin/{store_id}/categories/{category_id}    - One category
//! PATCH  /api/admin/{store_id}/categories/{category_id}    - Update category
//! DELETE /api/admin/{store_id}/categories/{category_id}    - Delete category
//!
//! GET    /api/admin/{store_id}/location-group              - List location groups
//! POST   /api/admin/{store_id}/location-group              - Create location group
//! GET    /api/admin/{store_id}/location-group/{group_id}   - One location group
//! PATCH  /api/admin/{store_id}/location-group/{group_id}   - Update location group
//! DELETE /api/admin/{store_id}/location-group/{group_id}   - Delete location group
//!
//! GET    /api/admin/{store_id}/coupons                     - List coupons
//! POST   /api/admin/{store_id}/coupons                     - Create coupon
//! GET    /api/admin/{store_id}/coupons/{coupon_id}         - One coupon
//! PATCH  /api/admin/{store_id}/coupons/{coupon_id}         - Update coupon
//! DELETE /api/admin/{store_id}/coupons/{coupon_id}         - Delete coupon
//!
//! POST   /api/upload-image                                 - Multipart `image` to the media host
//! POST   /api/upload-video                                 - Multipart `video` to the media host
//! ```

pub mod api;

use axum::Router;

use crate::state::AppState;

/// Create all routes for the back-office.
pub fn routes() -> Router<AppState> {
    api::router()
}
