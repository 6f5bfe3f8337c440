//! Authentication extractors and helpers for the back-office API.
//!
//! Every API answers an anonymous request with `401 Unauthorized Access`;
//! there are no HTML pages to redirect to.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::error::{AppError, set_sentry_user};
use crate::models::{CurrentAdmin, session_keys};

/// Extractor that requires a logged-in admin.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Rejection for [`RequireAdminAuth`].
pub struct AdminAuthRejection;

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        AppError::Unauthorized.into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection)?;

        current_admin(session)
            .await
            .ok()
            .flatten()
            .map(Self)
            .ok_or(AdminAuthRejection)
    }
}

/// The admin stored in the session, if any.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn current_admin(
    session: &Session,
) -> Result<Option<CurrentAdmin>, tower_sessions::session::Error> {
    session.get(session_keys::CURRENT_ADMIN).await
}

/// Require a logged-in admin, for handlers that must validate their body first.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` when nobody is logged in, or
/// `AppError::Session` when the session store fails.
pub async fn require_admin(session: &Session) -> Result<CurrentAdmin, AppError> {
    let admin = current_admin(session).await?.ok_or(AppError::Unauthorized)?;
    set_sentry_user(admin.id.as_str(), Some(admin.email.as_str()));
    Ok(admin)
}

/// Helper to set the current admin in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Helper to end the admin's session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be flushed.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
