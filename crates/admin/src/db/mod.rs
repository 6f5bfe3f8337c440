//! Database operations for the back-office `PostgreSQL`.
//!
//! ## Tables
//!
//! - `store` - Storefronts managed from this back-office
//! - `category`, `sub_category`, `product` - Catalog tree (products only for dependency checks)
//! - `location_group`, `location`, `variant_price` - Delivery serviceability and pricing
//! - `coupon`, `coupon_product`, `orders` - Discount coupons and their usage
//! - `admin.admin_user` - Back-office logins
//! - `admin.session` - Session storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p favobliss-cli -- migrate
//! ```

pub mod admin_users;
pub mod categories;
pub mod coupons;
pub mod location_groups;
pub mod stores;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::{AdminLogin, AdminUserRepository};
pub use categories::CategoryRepository;
pub use coupons::CouponRepository;
pub use location_groups::LocationGroupRepository;
pub use stores::StoreRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation (e.g., duplicate slug).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A referenced row does not exist (e.g., unknown product id).
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

impl RepositoryError {
    /// Classify a write error. Unique violations (SQLSTATE 23505) become
    /// [`RepositoryError::Conflict`] labelled with `what`; foreign key
    /// violations (23503) become [`RepositoryError::InvalidReference`] naming
    /// the constraint.
    pub(crate) fn from_write(err: sqlx::Error, what: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(what.to_owned())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Self::InvalidReference(db.constraint().unwrap_or("foreign key").to_owned())
            }
            _ => Self::Database(err),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_conflicts() {
        let err = RepositoryError::from_write(sqlx::Error::RowNotFound, "slug");
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
