//! Remote store API client.
//!
//! # Architecture
//!
//! - The store backend is the source of truth; nothing is persisted locally
//! - Plain JSON over HTTP with `reqwest`, scoped to one store id
//! - In-memory caching via `moka` for reference data (categories, colors,
//!   sizes, brands, location groups), matching the backend's 10-minute
//!   revalidation window
//! - [`retry_with_backoff`] for call sites that prefer a slower page over an
//!   empty one
//!
//! # Example
//!
//! ```rust,ignore
//! use favobliss_storefront::store_api::{ProductQuery, StoreClient};
//!
//! let client = StoreClient::new(&config.store_api)?;
//!
//! let detail = client.product_by_slug("linen-shirt-blue-m").await?;
//! let related = client
//!     .products(&ProductQuery::new().category(category_id).limit(10))
//!     .await?;
//! ```

mod cache;
mod client;
mod query;
mod retry;

pub use client::{StoreApiConfig, StoreClient, TimeFrame};
pub use query::ProductQuery;
pub use retry::{RetryPolicy, retry_with_backoff};

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when calling the store API.
#[derive(Debug, Error)]
pub enum StoreApiError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("store API returned {status}: {body}")]
    Status {
        status: StatusCode,
        /// Truncated response body.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Endpoint URL could not be built.
    #[error("invalid store API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl StoreApiError {
    /// Whether the error means the entity does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Status { status, .. } => *status == StatusCode::NOT_FOUND,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreApiError::NotFound("Product not found".to_string());
        assert_eq!(err.to_string(), "Not found: Product not found");

        let err = StoreApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        assert_eq!(err.to_string(), "store API returned 502 Bad Gateway: upstream down");
    }

    #[test]
    fn test_is_not_found() {
        assert!(StoreApiError::NotFound(String::new()).is_not_found());
        assert!(
            StoreApiError::Status {
                status: StatusCode::NOT_FOUND,
                body: String::new()
            }
            .is_not_found()
        );
        assert!(
            !StoreApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: String::new()
            }
            .is_not_found()
        );
    }
}
