//! Location group API handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use tower_sessions::Session;
use tracing::instrument;

use favobliss_core::{LocationGroup, LocationGroupId};

use super::{ensure_store, require_id, require_store_id, validated};
use crate::db::{LocationGroupRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::forms::LocationGroupForm;
use crate::middleware::{RequireAdminAuth, require_admin};
use crate::state::AppState;

const GROUP_ID_REQUIRED: &str = "Location group Id is required";
const GROUP_NOT_FOUND: &str = "Location group not found";

fn write_error(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound(GROUP_NOT_FOUND),
        other => AppError::Database(other),
    }
}

/// List a store's location groups.
#[instrument(skip(state, _admin))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<LocationGroup>>> {
    let store_id = require_store_id(store_id)?;
    let groups = LocationGroupRepository::new(state.pool())
        .list(&store_id)
        .await?;
    Ok(Json(groups))
}

/// Create a location group.
#[instrument(skip(state, session, body))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<String>,
    body: Bytes,
) -> Result<Json<LocationGroup>> {
    let input = validated::<LocationGroupForm>(&body)?;
    let admin = require_admin(&session).await?;
    let store_id = require_store_id(store_id)?;
    ensure_store(&state, &store_id).await?;

    let group = LocationGroupRepository::new(state.pool())
        .create(&store_id, &input)
        .await
        .map_err(write_error)?;

    tracing::info!(admin = %admin.id, group = %group.id, "Created location group");
    Ok(Json(group))
}

/// Get one location group.
#[instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path((store_id, group_id)): Path<(String, String)>,
) -> Result<Json<LocationGroup>> {
    let store_id = require_store_id(store_id)?;
    let group_id: LocationGroupId = require_id(group_id, GROUP_ID_REQUIRED)?;

    LocationGroupRepository::new(state.pool())
        .get(&store_id, &group_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(GROUP_NOT_FOUND))
}

/// Update a location group and its locations.
#[instrument(skip(state, session, body))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path((store_id, group_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<LocationGroup>> {
    let input = validated::<LocationGroupForm>(&body)?;
    let admin = require_admin(&session).await?;
    let store_id = require_store_id(store_id)?;
    let group_id: LocationGroupId = require_id(group_id, GROUP_ID_REQUIRED)?;
    ensure_store(&state, &store_id).await?;

    let group = LocationGroupRepository::new(state.pool())
        .update(&store_id, &group_id, &input)
        .await
        .map_err(write_error)?;

    tracing::info!(admin = %admin.id, group = %group.id, "Updated location group");
    Ok(Json(group))
}

/// Delete a location group nothing references.
#[instrument(skip(state, session))]
pub async fn destroy(
    State(state): State<AppState>,
    session: Session,
    Path((store_id, group_id)): Path<(String, String)>,
) -> Result<Json<LocationGroup>> {
    let admin = require_admin(&session).await?;
    let store_id = require_store_id(store_id)?;
    let group_id: LocationGroupId = require_id(group_id, GROUP_ID_REQUIRED)?;
    ensure_store(&state, &store_id).await?;

    let groups = LocationGroupRepository::new(state.pool());
    if groups.has_dependents(&group_id).await? {
        return Err(AppError::BadRequest(
            "Make sure you removed all related locations and variant prices first.",
        ));
    }

    let group = groups
        .delete(&store_id, &group_id)
        .await
        .map_err(write_error)?;

    tracing::info!(admin = %admin.id, group = %group.id, "Deleted location group");
    Ok(Json(group))
}
