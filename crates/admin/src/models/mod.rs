//! Domain models for the back-office.
//!
//! Catalog shapes (categories, location groups, coupons) are the shared
//! `favobliss_core` types; only back-office specific records live here.

pub mod admin_user;
pub mod session;

use chrono::{DateTime, Utc};
use serde::Serialize;

use favobliss_core::StoreId;

pub use admin_user::AdminUser;
pub use session::{CurrentAdmin, keys as session_keys};

/// A storefront managed from this back-office.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
