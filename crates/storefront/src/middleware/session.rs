//! Session middleware configuration.
//!
//! Shopper sessions only remember the chosen delivery location, so they live
//! in memory; a restart resets everyone to the fallback pincode.

use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use favobliss_core::DeliveryLocation;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "fb_session";

/// Session key holding the shopper's [`DeliveryLocation`].
const DELIVERY_LOCATION_KEY: &str = "delivery_location";

/// Session expiry time in seconds (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_https())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// The delivery location chosen in this session, if any.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn delivery_location(
    session: &Session,
) -> Result<Option<DeliveryLocation>, tower_sessions::session::Error> {
    session.get(DELIVERY_LOCATION_KEY).await
}

/// Remember the delivery location for this session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_delivery_location(
    session: &Session,
    location: &DeliveryLocation,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(DELIVERY_LOCATION_KEY, location).await
}
