//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! favobliss admin create -e admin@example.com -n "Admin Name"
//! ```
//!
//! The password comes from `--password`, `FAVOBLISS_ADMIN_PASSWORD`, or a
//! line read from stdin.

use std::io::BufRead;

use favobliss_admin::services::auth::AdminAuthService;
use favobliss_core::Email;

use super::{CliError, connect};

/// Create a new admin user.
///
/// # Errors
///
/// Returns `CliError::Invalid` for a malformed email or empty name, and
/// `CliError::Auth` if the password is too short or the email is taken.
pub async fn create_user(
    email: &str,
    name: &str,
    password: Option<String>,
) -> Result<(), CliError> {
    let email = Email::parse(email).map_err(|e| CliError::Invalid(e.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::Invalid("Name is required".to_owned()));
    }

    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    let pool = connect().await?;
    tracing::info!("Creating admin user: {}", email);

    let user = AdminAuthService::new(&pool)
        .create_admin(&email, name, &password)
        .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );
    Ok(())
}

fn read_password() -> Result<String, CliError> {
    tracing::info!("Enter password, then press Enter:");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}
