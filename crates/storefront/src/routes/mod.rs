//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /{slug}                  - Product (variant) page, redirects home when unknown
//! GET  /category/{slug}         - Category listing with filters
//! GET  /brand/{slug}            - Brand listing with filters
//! GET  /search                  - Search results (`query`, `page`, filters)
//! POST /location                - Set delivery pincode, redirect back
//! GET  /invoice/{order_id}      - Printable invoice
//! POST /api/recently-viewed     - Recently viewed products for the shopper's location
//! ```
//!
//! Anything else renders the 404 page.

pub mod api;
pub mod home;
pub mod invoice;
pub mod listing;
pub mod location;
pub mod not_found;
pub mod params;
pub mod products;
pub mod search;
pub mod views;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use favobliss_core::{DeliveryLocation, FALLBACK_PINCODE, LocationGroup, resolve_pincode};

use crate::middleware::session;
use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/search", get(search::search))
        .route("/category/{slug}", get(listing::category))
        .route("/brand/{slug}", get(listing::brand))
        .route("/location", post(location::set_location))
        .route("/invoice/{order_id}", get(invoice::show))
        .route("/api/recently-viewed", post(api::recently_viewed))
        .route("/{slug}", get(products::show))
        .fallback(not_found::not_found)
}

/// The shopper's delivery location. Session failures count as "not chosen".
pub(crate) async fn shopper_location(session: &Session) -> Option<DeliveryLocation> {
    match session::delivery_location(session).await {
        Ok(location) => location,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read delivery location from session");
            None
        }
    }
}

/// The chosen location, or the fallback pincode resolved against `groups`.
pub(crate) fn delivery_for(
    chosen: Option<DeliveryLocation>,
    groups: &[LocationGroup],
) -> DeliveryLocation {
    chosen.unwrap_or_else(|| resolve_pincode(groups, FALLBACK_PINCODE))
}
