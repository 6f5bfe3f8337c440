//! Seed a fresh database with a store.
//!
//! The printed store id is what the storefront's `STORE_ID` and the admin
//! API paths (`/api/admin/{store_id}/...`) expect.

use favobliss_admin::db::StoreRepository;

use super::{CliError, connect};

/// Create a store unless one with this name already exists.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the insert fails.
pub async fn store(name: &str) -> Result<(), CliError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::Invalid("Store name is required".to_owned()));
    }

    let pool = connect().await?;
    let stores = StoreRepository::new(&pool);

    if let Some(existing) = stores.list().await?.into_iter().find(|s| s.name == name) {
        tracing::info!("Store already exists: {} ({})", existing.name, existing.id);
        return Ok(());
    }

    let store = stores.create(name).await?;
    tracing::info!("Store created: {} ({})", store.name, store.id);
    tracing::info!("Set STORE_ID={} for the storefront", store.id);
    Ok(())
}
