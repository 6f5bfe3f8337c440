//! Page data aggregation.
//!
//! Each page issues its store API calls concurrently and degrades per fetch:
//! a failed sub-fetch is logged and replaced by an empty value so the page
//! still renders. Only the entity a page is about (the product, the category)
//! is allowed to turn the response into a redirect or a 404.

pub mod facets;
pub mod home;
pub mod listing;
pub mod product_page;
pub mod search;

use crate::store_api::StoreApiError;

/// Unwrap a sub-fetch, substituting `T::default()` on failure.
pub(crate) fn or_fallback<T: Default>(fetch: &'static str, result: Result<T, StoreApiError>) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!(fetch, error = %e, "Store API fetch failed, rendering fallback");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_fallback_passes_through_success() {
        let v: Vec<u32> = or_fallback("numbers", Ok(vec![1, 2]));
        assert_eq!(v, vec![1, 2]);
    }

    #[test]
    fn test_or_fallback_defaults_on_error() {
        let v: Vec<u32> = or_fallback(
            "numbers",
            Err(StoreApiError::NotFound("gone".to_owned())),
        );
        assert!(v.is_empty());
    }
}
