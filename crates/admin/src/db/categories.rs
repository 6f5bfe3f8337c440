//! Category repository.

use sqlx::PgPool;

use favobliss_core::{Category, CategoryClassification, CategoryId, CategoryType, StoreId};

use super::RepositoryError;
use crate::forms::CategoryInput;

/// Conflict label for duplicate slugs.
pub const SLUG_CONFLICT: &str = "slug";

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    slug: String,
    #[sqlx(rename = "type")]
    category_type: Option<CategoryType>,
    classification: Option<String>,
    banner_image: String,
    landing_page_banner: Option<String>,
    description: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            category_type: row.category_type,
            classification: row.classification.map(CategoryClassification::from),
            banner_image: row.banner_image,
            landing_page_banner: row.landing_page_banner,
            description: row.description,
            sub_categories: Vec::new(),
        }
    }
}

const CATEGORY_COLUMNS: &str =
    "id, name, slug, type, classification, banner_image, landing_page_banner, description";

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's categories by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store_id: &StoreId) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category WHERE store_id = $1 ORDER BY name"
        ))
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Get a category by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: &CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    /// Create a category in a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        store_id: &StoreId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r"
            INSERT INTO category
                (id, store_id, name, slug, type, classification,
                 banner_image, landing_page_banner, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {CATEGORY_COLUMNS}
            "
        ))
        .bind(CategoryId::generate())
        .bind(store_id)
        .bind(&input.name)
        .bind(input.slug.as_str())
        .bind(input.category_type)
        .bind(input.classification.as_ref().map(CategoryClassification::as_str))
        .bind(&input.banner_image)
        .bind(input.landing_page_banner.as_deref())
        .bind(input.description.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, SLUG_CONFLICT))?;

        Ok(row.into())
    }

    /// Update a category. Type and classification are kept when not supplied.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has this id in the store.
    /// Returns `RepositoryError::Conflict` if the new slug is taken.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        store_id: &StoreId,
        id: &CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r"
            UPDATE category
            SET name = $3,
                slug = $4,
                type = COALESCE($5, type),
                classification = COALESCE($6, classification),
                banner_image = $7,
                landing_page_banner = $8,
                description = $9,
                updated_at = NOW()
            WHERE id = $1 AND store_id = $2
            RETURNING {CATEGORY_COLUMNS}
            "
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.name)
        .bind(input.slug.as_str())
        .bind(input.category_type)
        .bind(input.classification.as_ref().map(CategoryClassification::as_str))
        .bind(&input.banner_image)
        .bind(input.landing_page_banner.as_deref())
        .bind(input.description.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, SLUG_CONFLICT))?;

        row.map(Category::from).ok_or(RepositoryError::NotFound)
    }

    /// Whether any product or sub-category still points at the category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn has_dependents(&self, id: &CategoryId) -> Result<bool, RepositoryError> {
        let found: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS (SELECT 1 FROM product WHERE category_id = $1)
                OR EXISTS (SELECT 1 FROM sub_category WHERE category_id = $1)
            ",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;
        Ok(found)
    }

    /// Delete a category and return it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has this id in the store.
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(
        &self,
        store_id: &StoreId,
        id: &CategoryId,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "DELETE FROM category WHERE id = $1 AND store_id = $2 RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Category::from).ok_or(RepositoryError::NotFound)
    }
}
