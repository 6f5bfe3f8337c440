//! Unified error handling for the back-office API.
//!
//! Responses are plain text with the admin-facing message. Server-side
//! failures are reported to Sentry and answered with `Internal server error`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the back-office.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("{0}")]
    NotFound(&'static str),

    /// User is not authenticated.
    #[error("Unauthorized Access")]
    Unauthorized,

    /// Login failed.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(&'static str),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias for handler results.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, message).into_response()
    }
}

/// Set the Sentry user context from an admin user ID.
pub fn set_sentry_user(admin_user_id: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_client_errors_keep_their_message() {
        assert_eq!(
            body_of(AppError::Unauthorized).await,
            (StatusCode::UNAUTHORIZED, "Unauthorized Access".to_string())
        );
        assert_eq!(
            body_of(AppError::NotFound("Category not found")).await,
            (StatusCode::NOT_FOUND, "Category not found".to_string())
        );
        assert_eq!(
            body_of(AppError::BadRequest("Invalid data provided")).await,
            (StatusCode::BAD_REQUEST, "Invalid data provided".to_string())
        );
    }

    #[tokio::test]
    async fn test_server_errors_are_hidden() {
        let (status, body) =
            body_of(AppError::Database(RepositoryError::DataCorruption("bad row".into()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal server error");
    }
}
