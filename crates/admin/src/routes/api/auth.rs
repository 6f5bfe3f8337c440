//! Admin login, logout and identity.

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use tower_sessions::Session;
use tracing::instrument;

use super::validated;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::forms::LoginForm;
use crate::middleware::{RequireAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::auth::{AdminAuthError, AdminAuthService};
use crate::state::AppState;

/// Log in with email and password.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    body: Bytes,
) -> Result<Json<CurrentAdmin>> {
    let input = validated::<LoginForm>(&body)?;

    let user = AdminAuthService::new(state.pool())
        .login(&input.email, &input.password)
        .await
        .map_err(|e| match e {
            AdminAuthError::InvalidCredentials => AppError::InvalidCredentials,
            AdminAuthError::Repository(err) => AppError::Database(err),
            other => AppError::Internal(other.to_string()),
        })?;

    let admin = CurrentAdmin::from(&user);
    set_current_admin(&session, &admin).await?;
    set_sentry_user(admin.id.as_str(), Some(admin.email.as_str()));

    tracing::info!(admin = %admin.id, "Admin logged in");
    Ok(Json(admin))
}

/// End the session. Succeeds with or without a logged-in admin.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The logged-in admin.
pub async fn me(RequireAdminAuth(admin): RequireAdminAuth) -> Json<CurrentAdmin> {
    Json(admin)
}
