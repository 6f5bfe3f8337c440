//! Store repository.

use sqlx::PgPool;

use favobliss_core::StoreId;

use super::RepositoryError;
use crate::models::Store;

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whether a store with this id exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: &StoreId) -> Result<bool, RepositoryError> {
        let found: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM store WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool)
            .await?;
        Ok(found)
    }

    /// List all stores, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Store>, RepositoryError> {
        let stores = sqlx::query_as::<_, Store>(
            "SELECT id, name, created_at FROM store ORDER BY created_at",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(stores)
    }

    /// Create a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, name: &str) -> Result<Store, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            INSERT INTO store (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at
            ",
        )
        .bind(StoreId::generate())
        .bind(name)
        .fetch_one(self.pool)
        .await?;
        Ok(store)
    }
}
