//! Category API handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use tower_sessions::Session;
use tracing::instrument;

use favobliss_core::{Category, CategoryId};

use super::{ensure_store, require_id, require_store_id, validated};
use crate::db::{CategoryRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::forms::CategoryForm;
use crate::middleware::require_admin;
use crate::state::AppState;

const CATEGORY_ID_REQUIRED: &str = "Category Id is required";
const CATEGORY_NOT_FOUND: &str = "Category not found";

/// Map write failures to the admin-facing messages.
fn write_error(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::Conflict(_) => AppError::BadRequest("Slug already exists"),
        RepositoryError::NotFound => AppError::NotFound(CATEGORY_NOT_FOUND),
        other => AppError::Database(other),
    }
}

/// List a store's categories.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<Category>>> {
    let store_id = require_store_id(store_id)?;
    let categories = CategoryRepository::new(state.pool()).list(&store_id).await?;
    Ok(Json(categories))
}

/// Create a category.
#[instrument(skip(state, session, body))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<String>,
    body: Bytes,
) -> Result<Json<Category>> {
    let input = validated::<CategoryForm>(&body)?;
    let admin = require_admin(&session).await?;
    let store_id = require_store_id(store_id)?;
    ensure_store(&state, &store_id).await?;

    let category = CategoryRepository::new(state.pool())
        .create(&store_id, &input)
        .await
        .map_err(write_error)?;

    tracing::info!(admin = %admin.id, category = %category.id, "Created category");
    Ok(Json(category))
}

/// Get one category.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path((_store_id, category_id)): Path<(String, String)>,
) -> Result<Json<Category>> {
    let category_id: CategoryId = require_id(category_id, CATEGORY_ID_REQUIRED)?;
    CategoryRepository::new(state.pool())
        .get(&category_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(CATEGORY_NOT_FOUND))
}

/// Update a category.
#[instrument(skip(state, session, body))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path((store_id, category_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Category>> {
    let input = validated::<CategoryForm>(&body)?;
    let admin = require_admin(&session).await?;
    let store_id = require_store_id(store_id)?;
    let category_id: CategoryId = require_id(category_id, CATEGORY_ID_REQUIRED)?;
    ensure_store(&state, &store_id).await?;

    let category = CategoryRepository::new(state.pool())
        .update(&store_id, &category_id, &input)
        .await
        .map_err(write_error)?;

    tracing::info!(admin = %admin.id, category = %category.id, "Updated category");
    Ok(Json(category))
}

/// Delete a category that has no products or sub-categories.
#[instrument(skip(state, session))]
pub async fn destroy(
    State(state): State<AppState>,
    session: Session,
    Path((store_id, category_id)): Path<(String, String)>,
) -> Result<Json<Category>> {
    let admin = require_admin(&session).await?;
    let store_id = require_store_id(store_id)?;
    let category_id: CategoryId = require_id(category_id, CATEGORY_ID_REQUIRED)?;
    ensure_store(&state, &store_id).await?;

    let categories = CategoryRepository::new(state.pool());
    if categories.has_dependents(&category_id).await? {
        return Err(AppError::BadRequest(
            "Cannot delete category with associated products or subcategories",
        ));
    }

    let category = categories
        .delete(&store_id, &category_id)
        .await
        .map_err(write_error)?;

    tracing::info!(admin = %admin.id, category = %category.id, "Deleted category");
    Ok(Json(category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_messages() {
        assert_eq!(
            write_error(RepositoryError::Conflict("slug".into())).to_string(),
            "Slug already exists"
        );
        assert_eq!(
            write_error(RepositoryError::NotFound).to_string(),
            "Category not found"
        );
        assert!(matches!(
            write_error(RepositoryError::DataCorruption("x".into())),
            AppError::Database(_)
        ));
    }
}
