//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during admin authentication.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Wrong password or unknown email.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password too short.
    #[error("password must be at least {0} characters")]
    WeakPassword(usize),

    /// An admin with this email already exists.
    #[error("admin user already exists")]
    UserAlreadyExists,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
