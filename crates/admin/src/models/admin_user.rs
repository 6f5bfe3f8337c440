//! Admin user domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use favobliss_core::{AdminUserId, Email};

/// A back-office login (domain type). The password hash never leaves the
/// repository.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
