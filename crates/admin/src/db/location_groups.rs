//! Location group repository.
//!
//! A group owns its locations through `location.location_group_id`; saving a
//! group re-points exactly the listed locations at it.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};

use favobliss_core::{Location, LocationGroup, LocationGroupId, LocationId, StoreId};

use super::RepositoryError;
use crate::forms::LocationGroupInput;

#[derive(Debug, sqlx::FromRow)]
struct LocationGroupRow {
    id: LocationGroupId,
    name: String,
    is_cod_available: bool,
    delivery_days: i32,
    is_express_delivery: bool,
    express_delivery_text: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct LocationRow {
    id: LocationId,
    location_group_id: Option<LocationGroupId>,
    pincode: String,
    city: String,
    state: String,
    country: String,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Self {
            id: row.id,
            pincode: row.pincode,
            city: row.city,
            state: row.state,
            country: row.country,
        }
    }
}

fn into_group(row: LocationGroupRow, locations: Vec<Location>) -> Result<LocationGroup, RepositoryError> {
    let delivery_days = u32::try_from(row.delivery_days).map_err(|_| {
        RepositoryError::DataCorruption(format!(
            "location group {} has negative delivery days",
            row.id
        ))
    })?;

    Ok(LocationGroup {
        id: row.id,
        name: row.name,
        locations,
        is_cod_available: row.is_cod_available,
        delivery_days,
        is_express_delivery: row.is_express_delivery,
        express_delivery_text: row.express_delivery_text,
    })
}

const GROUP_COLUMNS: &str =
    "id, name, is_cod_available, delivery_days, is_express_delivery, express_delivery_text";

/// Repository for location group database operations.
pub struct LocationGroupRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LocationGroupRepository<'a> {
    /// Create a new location group repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's groups with their locations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn list(&self, store_id: &StoreId) -> Result<Vec<LocationGroup>, RepositoryError> {
        let rows = sqlx::query_as::<_, LocationGroupRow>(&format!(
            "SELECT {GROUP_COLUMNS} FROM location_group WHERE store_id = $1 ORDER BY name"
        ))
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<LocationGroupId> = rows.iter().map(|r| r.id.clone()).collect();
        let location_rows = sqlx::query_as::<_, LocationRow>(
            r"
            SELECT id, location_group_id, pincode, city, state, country
            FROM location
            WHERE location_group_id = ANY($1)
            ORDER BY pincode
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_group: HashMap<LocationGroupId, Vec<Location>> = HashMap::new();
        for row in location_rows {
            if let Some(group) = row.location_group_id.clone() {
                by_group.entry(group).or_default().push(row.into());
            }
        }

        rows.into_iter()
            .map(|row| {
                let locations = by_group.remove(&row.id).unwrap_or_default();
                into_group(row, locations)
            })
            .collect()
    }

    /// Get one group in a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn get(
        &self,
        store_id: &StoreId,
        id: &LocationGroupId,
    ) -> Result<Option<LocationGroup>, RepositoryError> {
        let row = sqlx::query_as::<_, LocationGroupRow>(&format!(
            "SELECT {GROUP_COLUMNS} FROM location_group WHERE id = $1 AND store_id = $2"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let locations = locations_of(self.pool, &row.id).await?;
                into_group(row, locations).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Create a group and attach the listed locations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn create(
        &self,
        store_id: &StoreId,
        input: &LocationGroupInput,
    ) -> Result<LocationGroup, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, LocationGroupRow>(&format!(
            r"
            INSERT INTO location_group
                (id, store_id, name, is_cod_available, delivery_days,
                 is_express_delivery, express_delivery_text)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {GROUP_COLUMNS}
            "
        ))
        .bind(LocationGroupId::generate())
        .bind(store_id)
        .bind(&input.name)
        .bind(input.is_cod_available)
        .bind(input.delivery_days)
        .bind(input.is_express_delivery)
        .bind(input.express_delivery_text.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        attach_locations(&mut tx, store_id, &row.id, &input.location_ids).await?;
        tx.commit().await?;

        let locations = locations_of(self.pool, &row.id).await?;
        into_group(row, locations)
    }

    /// Update a group and replace its location membership.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no group has this id in the store.
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn update(
        &self,
        store_id: &StoreId,
        id: &LocationGroupId,
        input: &LocationGroupInput,
    ) -> Result<LocationGroup, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, LocationGroupRow>(&format!(
            r"
            UPDATE location_group
            SET name = $3,
                is_cod_available = $4,
                delivery_days = $5,
                is_express_delivery = $6,
                express_delivery_text = $7,
                updated_at = NOW()
            WHERE id = $1 AND store_id = $2
            RETURNING {GROUP_COLUMNS}
            "
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.name)
        .bind(input.is_cod_available)
        .bind(input.delivery_days)
        .bind(input.is_express_delivery)
        .bind(input.express_delivery_text.as_deref())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        sqlx::query(
            r"
            UPDATE location
            SET location_group_id = NULL
            WHERE location_group_id = $1 AND NOT (id = ANY($2))
            ",
        )
        .bind(id)
        .bind(&input.location_ids)
        .execute(&mut *tx)
        .await?;

        attach_locations(&mut tx, store_id, id, &input.location_ids).await?;
        tx.commit().await?;

        let locations = locations_of(self.pool, id).await?;
        into_group(row, locations)
    }

    /// Whether locations or variant prices still reference the group.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn has_dependents(&self, id: &LocationGroupId) -> Result<bool, RepositoryError> {
        let found: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS (SELECT 1 FROM location WHERE location_group_id = $1)
                OR EXISTS (SELECT 1 FROM variant_price WHERE location_group_id = $1)
            ",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;
        Ok(found)
    }

    /// Delete a group and return it (without locations, which must already be gone).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no group has this id in the store.
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(
        &self,
        store_id: &StoreId,
        id: &LocationGroupId,
    ) -> Result<LocationGroup, RepositoryError> {
        let row = sqlx::query_as::<_, LocationGroupRow>(&format!(
            "DELETE FROM location_group WHERE id = $1 AND store_id = $2 RETURNING {GROUP_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        into_group(row, Vec::new())
    }
}

async fn locations_of(
    pool: &PgPool,
    group: &LocationGroupId,
) -> Result<Vec<Location>, RepositoryError> {
    let rows = sqlx::query_as::<_, LocationRow>(
        r"
        SELECT id, location_group_id, pincode, city, state, country
        FROM location
        WHERE location_group_id = $1
        ORDER BY pincode
        ",
    )
    .bind(group)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Location::from).collect())
}

async fn attach_locations(
    tx: &mut Transaction<'_, Postgres>,
    store_id: &StoreId,
    group: &LocationGroupId,
    location_ids: &[LocationId],
) -> Result<(), RepositoryError> {
    if location_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r"
        UPDATE location
        SET location_group_id = $1
        WHERE store_id = $2 AND id = ANY($3)
        ",
    )
    .bind(group)
    .bind(store_id)
    .bind(location_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
