//! Search results page aggregation.

use tracing::instrument;

use favobliss_core::filters::{Breadcrumbs, total_pages};
use favobliss_core::{CategoryClassification, LocationGroup, Product};

use super::facets::Facets;
use super::or_fallback;
use crate::store_api::{ProductQuery, RetryPolicy, StoreClient, retry_with_backoff};

/// Results per search page.
pub const SEARCH_PAGE_SIZE: u32 = 12;

/// A search request as parsed from the URL.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
    /// Sidebar filters; paging fields are ignored.
    pub filters: ProductQuery,
}

/// Rendered search results.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub query: String,
    pub page: u32,
    pub products: Vec<Product>,
    pub total_products: u32,
    pub total_pages: u32,
    pub facets: Facets,
    pub location_groups: Vec<LocationGroup>,
    pub breadcrumbs: Breadcrumbs,
}

/// Result of loading a search page.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Blank query; nothing was fetched.
    NoQuery,
    Results(Box<SearchPage>),
}

/// Load search results.
///
/// All five store calls run concurrently and each is retried with back-off.
/// A call that still fails renders as empty.
#[instrument(skip(client, request), fields(query = %request.query, page = request.page))]
pub async fn load(client: &StoreClient, request: SearchRequest) -> SearchOutcome {
    let query = request.query.trim().to_owned();
    if query.is_empty() {
        return SearchOutcome::NoQuery;
    }
    let page = request.page.max(1);
    let policy = RetryPolicy::default();

    let (results, sizes, colors, brands, groups) = tokio::join!(
        retry_with_backoff(policy, || client.search(
            &query,
            &request.filters,
            page,
            SEARCH_PAGE_SIZE
        )),
        retry_with_backoff(policy, || client.sizes()),
        retry_with_backoff(policy, || client.colors()),
        retry_with_backoff(policy, || client.brands()),
        retry_with_backoff(policy, || client.location_groups()),
    );

    let results = or_fallback("search results", results);
    let classification = results
        .products
        .first()
        .and_then(Product::classification)
        .cloned()
        .unwrap_or(CategoryClassification::Topwear);

    let facets = Facets::build(
        &classification,
        or_fallback("sizes", sizes),
        or_fallback("colors", colors),
        or_fallback("brands", brands),
    );

    let total_products = results.pagination.total_products;
    let breadcrumbs = Breadcrumbs::new().push_verbatim(
        query.to_uppercase(),
        Some(format!("/search?query={}&page=1", urlencoding::encode(&query))),
    );

    SearchOutcome::Results(Box::new(SearchPage {
        query,
        page,
        products: results.products,
        total_products,
        total_pages: total_pages(total_products, SEARCH_PAGE_SIZE),
        facets,
        location_groups: or_fallback("location groups", groups),
        breadcrumbs,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use url::Url;

    use favobliss_core::StoreId;

    use super::*;
    use crate::store_api::StoreApiConfig;

    #[tokio::test]
    async fn test_blank_query_fetches_nothing() {
        // Nothing listens on this port; any fetch would fail.
        let client = StoreClient::new(&StoreApiConfig {
            base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            store_id: StoreId::new("store"),
            cache_ttl: Duration::from_secs(60),
            timeout: Duration::from_millis(50),
        })
        .unwrap();
        let request = SearchRequest {
            query: "   ".to_owned(),
            ..SearchRequest::default()
        };
        assert!(matches!(load(&client, request).await, SearchOutcome::NoQuery));
    }
}
