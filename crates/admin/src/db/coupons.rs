//! Coupon repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use favobliss_core::{Coupon, CouponId, ProductId, StoreId};

use super::RepositoryError;
use crate::forms::CouponInput;

/// Conflict label for duplicate codes.
pub const CODE_CONFLICT: &str = "code";

#[derive(Debug, sqlx::FromRow)]
struct CouponRow {
    id: CouponId,
    store_id: StoreId,
    code: String,
    is_active: bool,
    value: Decimal,
    start_date: DateTime<Utc>,
    expiry_date: DateTime<Utc>,
    product_ids: Vec<ProductId>,
    usage_per_user: i32,
    used_count: i32,
    description: Option<String>,
}

impl From<CouponRow> for Coupon {
    fn from(row: CouponRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            code: row.code,
            is_active: row.is_active,
            value: row.value,
            start_date: row.start_date,
            expiry_date: row.expiry_date,
            product_ids: row.product_ids,
            usage_per_user: row.usage_per_user,
            used_count: row.used_count,
            description: row.description,
        }
    }
}

const SELECT_COUPON: &str = r"
    SELECT c.id, c.store_id, c.code, c.is_active, c.value, c.start_date, c.expiry_date,
           COALESCE(
               ARRAY_AGG(cp.product_id ORDER BY cp.product_id)
                   FILTER (WHERE cp.product_id IS NOT NULL),
               '{}'
           ) AS product_ids,
           c.usage_per_user, c.used_count, c.description
    FROM coupon c
    LEFT JOIN coupon_product cp ON cp.coupon_id = c.id
";

/// Repository for coupon database operations.
pub struct CouponRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CouponRepository<'a> {
    /// Create a new coupon repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's coupons, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store_id: &StoreId) -> Result<Vec<Coupon>, RepositoryError> {
        let rows = sqlx::query_as::<_, CouponRow>(&format!(
            "{SELECT_COUPON} WHERE c.store_id = $1 GROUP BY c.id ORDER BY c.created_at DESC"
        ))
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Coupon::from).collect())
    }

    /// Get one coupon in a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        store_id: &StoreId,
        id: &CouponId,
    ) -> Result<Option<Coupon>, RepositoryError> {
        fetch(self.pool, store_id, id).await
    }

    /// Create a coupon.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code is taken in this store.
    /// Returns `RepositoryError::InvalidReference` for an unknown product id.
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn create(
        &self,
        store_id: &StoreId,
        input: &CouponInput,
    ) -> Result<Coupon, RepositoryError> {
        let id = CouponId::generate();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO coupon
                (id, store_id, code, is_active, value, start_date, expiry_date,
                 usage_per_user, used_count, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(&id)
        .bind(store_id)
        .bind(&input.code)
        .bind(input.is_active)
        .bind(input.value)
        .bind(input.start_date)
        .bind(input.expiry_date)
        .bind(input.usage_per_user)
        .bind(input.used_count)
        .bind(input.description.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_write(e, CODE_CONFLICT))?;

        replace_products(&mut tx, &id, &input.product_ids).await?;
        tx.commit().await?;

        fetch(self.pool, store_id, &id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Update a coupon and replace its product list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no coupon has this id in the store.
    /// Returns `RepositoryError::Conflict` if the new code is taken.
    /// Returns `RepositoryError::InvalidReference` for an unknown product id.
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn update(
        &self,
        store_id: &StoreId,
        id: &CouponId,
        input: &CouponInput,
    ) -> Result<Coupon, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r"
            UPDATE coupon
            SET code = $3,
                is_active = $4,
                value = $5,
                start_date = $6,
                expiry_date = $7,
                usage_per_user = $8,
                used_count = $9,
                description = $10,
                updated_at = NOW()
            WHERE id = $1 AND store_id = $2
            ",
        )
        .bind(id)
        .bind(store_id)
        .bind(&input.code)
        .bind(input.is_active)
        .bind(input.value)
        .bind(input.start_date)
        .bind(input.expiry_date)
        .bind(input.usage_per_user)
        .bind(input.used_count)
        .bind(input.description.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_write(e, CODE_CONFLICT))?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        replace_products(&mut tx, id, &input.product_ids).await?;
        tx.commit().await?;

        fetch(self.pool, store_id, id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Whether any order used the coupon.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn has_orders(&self, id: &CouponId) -> Result<bool, RepositoryError> {
        let found: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM orders WHERE coupon_id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;
        Ok(found)
    }

    /// Delete a coupon and return it as it was.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no coupon has this id in the store.
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, store_id: &StoreId, id: &CouponId) -> Result<Coupon, RepositoryError> {
        let coupon = fetch(self.pool, store_id, id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        sqlx::query("DELETE FROM coupon WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store_id)
            .execute(self.pool)
            .await?;

        Ok(coupon)
    }
}

async fn fetch(
    pool: &PgPool,
    store_id: &StoreId,
    id: &CouponId,
) -> Result<Option<Coupon>, RepositoryError> {
    let row = sqlx::query_as::<_, CouponRow>(&format!(
        "{SELECT_COUPON} WHERE c.id = $1 AND c.store_id = $2 GROUP BY c.id"
    ))
    .bind(id)
    .bind(store_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Coupon::from))
}

async fn replace_products(
    tx: &mut Transaction<'_, Postgres>,
    coupon: &CouponId,
    product_ids: &[ProductId],
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM coupon_product WHERE coupon_id = $1")
        .bind(coupon)
        .execute(&mut **tx)
        .await?;

    if product_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r"
        INSERT INTO coupon_product (coupon_id, product_id)
        SELECT $1, UNNEST($2::TEXT[])
        ",
    )
    .bind(coupon)
    .bind(product_ids)
    .execute(&mut **tx)
    .await
    .map_err(|e| RepositoryError::from_write(e, "coupon product"))?;

    Ok(())
}
