//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! favobliss migrate
//! ```
//!
//! Migration files live in `crates/admin/migrations/` and cover the `admin`
//! schema (users, sessions) and the catalog tables.

use super::{CliError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
