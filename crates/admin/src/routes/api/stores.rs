//! Store listing for the back-office store switcher.

use axum::{Json, extract::State};

use crate::db::StoreRepository;
use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::models::Store;
use crate::state::AppState;

/// List every store.
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Vec<Store>>> {
    let stores = StoreRepository::new(state.pool()).list().await?;
    Ok(Json(stores))
}
