//! JSON endpoints used by page scripts.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use favobliss_core::{Product, ProductId};

use super::shopper_location;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Most products a recently viewed request may ask for.
const MAX_RECENTLY_VIEWED: usize = 20;

/// Recently viewed request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentlyViewedRequest {
    pub product_ids: Vec<ProductId>,
}

/// Products the shopper viewed recently, priced for their location.
#[instrument(skip_all, fields(count = body.product_ids.len()))]
pub async fn recently_viewed(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RecentlyViewedRequest>,
) -> Result<Json<Vec<Product>>> {
    if body.product_ids.len() > MAX_RECENTLY_VIEWED {
        return Err(AppError::BadRequest(format!(
            "At most {MAX_RECENTLY_VIEWED} products can be requested"
        )));
    }
    if body.product_ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let location = shopper_location(&session).await;
    let products = state
        .store()
        .recently_viewed(
            &body.product_ids,
            location.as_ref().and_then(|l| l.location_id.as_ref()),
        )
        .await?;
    Ok(Json(products))
}
