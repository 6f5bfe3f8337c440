//! Store API client implementation.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use favobliss_core::{
    Brand, Category, CategoryId, Color, Coupon, InvoiceData, Location, LocationGroup,
    LocationGroupId, LocationId, OrderId, Product, ProductApiResponse, ProductId, ProductList,
    SearchResults, Size, StoreId, SubCategory, SubCategoryId,
};

use super::StoreApiError;
use super::cache::{self, CacheValue};
use super::query::ProductQuery;

/// Bodies longer than this are cut when logged.
const LOG_BODY_LIMIT: usize = 200;

/// Connection settings for [`StoreClient`].
#[derive(Debug, Clone)]
pub struct StoreApiConfig {
    /// Origin of the store backend, e.g. `https://admin.favobliss.com`.
    pub base_url: Url,
    pub store_id: StoreId,
    /// How long reference data (categories, colors, sizes, brands, location groups) is cached.
    pub cache_ttl: Duration,
    pub timeout: Duration,
}

/// Client for the remote store API.
///
/// Every call resolves against `{base_url}/api/admin/{store_id}/`. Reference
/// data is cached in memory; product, search and invoice calls always hit the
/// network.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    client: reqwest::Client,
    root: Url,
    cache: Cache<&'static str, CacheValue>,
}

/// Hot-deal window accepted by `products/hot-deals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFrame {
    Week,
    Month,
    Quarter,
    AllTime,
}

impl TimeFrame {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "7 days",
            Self::Month => "30 days",
            Self::Quarter => "90 days",
            Self::AllTime => "all time",
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecentlyViewedRequest<'a> {
    product_ids: &'a [ProductId],
    #[serde(skip_serializing_if = "Option::is_none")]
    location_id: Option<&'a LocationId>,
}

impl StoreClient {
    /// Create a new store API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the store root URL cannot be built or the HTTP
    /// client fails to initialise.
    pub fn new(config: &StoreApiConfig) -> Result<Self, StoreApiError> {
        let root = config
            .base_url
            .join(&format!("api/admin/{}/", urlencoding::encode(config.store_id.as_str())))?;

        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("favobliss-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(StoreClientInner {
                client,
                root,
                cache,
            }),
        })
    }

    /// Resolve `path` under the store root.
    fn endpoint(&self, path: &str) -> Result<Url, StoreApiError> {
        Ok(self.inner.root.join(path)?)
    }

    /// Resolve `path` and attach query pairs.
    fn endpoint_with<K, V>(
        &self,
        path: &str,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Url, StoreApiError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.endpoint(path)?;
        {
            let mut query = url.query_pairs_mut();
            for (k, v) in pairs {
                query.append_pair(k.as_ref(), v.as_ref());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    /// Send a request and return the status and body text.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(StatusCode, String), StoreApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// Fail on non-success status, logging a truncated body.
    fn check_status(url: &Url, status: StatusCode, body: &str) -> Result<(), StoreApiError> {
        if status.is_success() {
            return Ok(());
        }
        let snippet: String = body.chars().take(LOG_BODY_LIMIT).collect();
        tracing::error!(
            url = %url,
            status = %status,
            body = %snippet,
            "Store API returned non-success status"
        );
        Err(StoreApiError::Status {
            status,
            body: snippet,
        })
    }

    fn parse<T: DeserializeOwned>(url: &Url, body: &str) -> Result<T, StoreApiError> {
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                url = %url,
                error = %e,
                body = %body.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                "Failed to parse store API response"
            );
            StoreApiError::Parse(e)
        })
    }

    /// GET `url` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, StoreApiError> {
        let (status, body) = self.send(self.inner.client.get(url.clone())).await?;
        Self::check_status(&url, status, &body)?;
        Self::parse(&url, &body)
    }

    /// GET `url`, mapping 404, an empty body or `null` to `None`.
    async fn get_optional<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, StoreApiError> {
        let (status, body) = self.send(self.inner.client.get(url.clone())).await?;
        if status == StatusCode::NOT_FOUND {
            debug!(url = %url, "Store API returned 404");
            return Ok(None);
        }
        Self::check_status(&url, status, &body)?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }
        Self::parse(&url, trimmed)
    }

    /// Serve a reference list from cache, fetching and caching it on a miss.
    async fn cached_list<T, W, U>(
        &self,
        key: &'static str,
        path: &str,
        wrap: W,
        unwrap: U,
    ) -> Result<Vec<T>, StoreApiError>
    where
        T: DeserializeOwned + Clone,
        W: FnOnce(Vec<T>) -> CacheValue,
        U: FnOnce(CacheValue) -> Option<Vec<T>>,
    {
        if let Some(items) = self.inner.cache.get(&key).await.and_then(unwrap) {
            debug!(key, "Cache hit");
            return Ok(items);
        }

        let items: Vec<T> = self.get_json(self.endpoint(path)?).await?;
        self.inner.cache.insert(key, wrap(items.clone())).await;
        Ok(items)
    }

    /// Drop all cached reference data.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    // =========================================================================
    // Reference data (cached)
    // =========================================================================

    /// All brands.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn brands(&self) -> Result<Vec<Brand>, StoreApiError> {
        self.cached_list(cache::BRANDS, "brands", CacheValue::Brands, |v| match v {
            CacheValue::Brands(b) => Some(b),
            _ => None,
        })
        .await
    }

    /// All categories with their sub-categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, StoreApiError> {
        self.cached_list(cache::CATEGORIES, "categories", CacheValue::Categories, |v| {
            match v {
                CacheValue::Categories(c) => Some(c),
                _ => None,
            }
        })
        .await
    }

    /// All colors.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn colors(&self) -> Result<Vec<Color>, StoreApiError> {
        self.cached_list(cache::COLORS, "colors", CacheValue::Colors, |v| match v {
            CacheValue::Colors(c) => Some(c),
            _ => None,
        })
        .await
    }

    /// All sizes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn sizes(&self) -> Result<Vec<Size>, StoreApiError> {
        self.cached_list(cache::SIZES, "sizes", CacheValue::Sizes, |v| match v {
            CacheValue::Sizes(s) => Some(s),
            _ => None,
        })
        .await
    }

    /// All delivery location groups with their locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn location_groups(&self) -> Result<Vec<LocationGroup>, StoreApiError> {
        self.cached_list(
            cache::LOCATION_GROUPS,
            "location-group",
            CacheValue::LocationGroups,
            |v| match v {
                CacheValue::LocationGroups(g) => Some(g),
                _ => None,
            },
        )
        .await
    }

    // =========================================================================
    // Catalog lookups
    // =========================================================================

    /// Brand by slug, `None` if unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn brand_by_slug(&self, slug: &str) -> Result<Option<Brand>, StoreApiError> {
        self.get_optional(self.endpoint_with("brands", [("slug", slug)])?)
            .await
    }

    /// Category by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn category(&self, id: &CategoryId) -> Result<Category, StoreApiError> {
        self.get_json(self.endpoint(&format!("categories/{}", urlencoding::encode(id.as_str())))?)
            .await
    }

    /// Category by slug, `None` if unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreApiError> {
        self.get_optional(self.endpoint_with("categories", [("slug", slug)])?)
            .await
    }

    /// Sub-category by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn subcategory(&self, id: &SubCategoryId) -> Result<SubCategory, StoreApiError> {
        self.get_json(self.endpoint(&format!(
            "subcategories/{}",
            urlencoding::encode(id.as_str())
        ))?)
        .await
    }

    /// Sub-categories of a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category_id = %category_id))]
    pub async fn subcategories(
        &self,
        category_id: &CategoryId,
    ) -> Result<Vec<SubCategory>, StoreApiError> {
        self.get_json(self.endpoint(&format!(
            "categories/{}/subcategories",
            urlencoding::encode(category_id.as_str())
        ))?)
        .await
    }

    /// Sub-category by slug, `None` if unknown.
    ///
    /// Anything after a `?` in `slug` is ignored; links built from listing
    /// URLs sometimes carry their query string along.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn subcategory_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<SubCategory>, StoreApiError> {
        let clean = slug.split('?').next().unwrap_or_default();
        self.get_optional(self.endpoint_with("subcategories", [("slug", clean)])?)
            .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, StoreApiError> {
        self.get_json(self.endpoint(&format!("products/{}", urlencoding::encode(id.as_str())))?)
            .await
    }

    /// Product detail by slug: the matching variant, its product and sibling variants.
    ///
    /// # Errors
    ///
    /// Returns `StoreApiError::NotFound` if the store does not know the slug,
    /// or another error if the API request fails.
    #[instrument(skip(self))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<ProductApiResponse, StoreApiError> {
        let url = self.endpoint_with("products", [("slug", slug)])?;
        let (status, body) = self.send(self.inner.client.get(url.clone())).await?;
        if !status.is_success() {
            debug!(url = %url, status = %status, "Product lookup failed");
            return Err(StoreApiError::NotFound("Product not found".to_owned()));
        }
        Self::parse(&url, &body)
    }

    /// Products matching `query`. An empty response body is an empty page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<ProductList, StoreApiError> {
        let url = self.endpoint_with("products", query.to_pairs())?;
        let (status, body) = self.send(self.inner.client.get(url.clone())).await?;
        Self::check_status(&url, status, &body)?;
        if body.trim().is_empty() {
            tracing::warn!(url = %url, "Empty products response");
            return Ok(ProductList::default());
        }
        Self::parse(&url, &body)
    }

    /// Best-selling products in a time window.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn hot_deals(
        &self,
        category_id: Option<&CategoryId>,
        limit: u32,
        time_frame: TimeFrame,
    ) -> Result<Vec<Product>, StoreApiError> {
        let mut pairs = vec![
            ("limit", limit.to_string()),
            ("timeFrame", time_frame.as_str().to_owned()),
        ];
        if let Some(id) = category_id {
            pairs.push(("categoryId", id.to_string()));
        }
        let url = self.endpoint_with("products/hot-deals", pairs)?;
        Ok(self.get_optional(url).await?.unwrap_or_default())
    }

    /// Products for the given ids, priced for `location_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, product_ids), fields(count = product_ids.len()))]
    pub async fn recently_viewed(
        &self,
        product_ids: &[ProductId],
        location_id: Option<&LocationId>,
    ) -> Result<Vec<Product>, StoreApiError> {
        let url = self.endpoint("products/recently-viewed")?;
        let request = self.inner.client.post(url.clone()).json(&RecentlyViewedRequest {
            product_ids,
            location_id,
        });
        let (status, body) = self.send(request).await?;
        Self::check_status(&url, status, &body)?;
        Self::parse(&url, &body)
    }

    /// Free-text search.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filters))]
    pub async fn search(
        &self,
        query: &str,
        filters: &ProductQuery,
        page: u32,
        limit: u32,
    ) -> Result<SearchResults, StoreApiError> {
        let mut pairs: Vec<(&str, String)> = vec![("query", query.to_owned())];
        pairs.extend(
            filters
                .to_pairs()
                .into_iter()
                .filter(|(k, _)| *k != "page" && *k != "limit"),
        );
        pairs.push(("page", page.to_string()));
        pairs.push(("limit", limit.to_string()));
        self.get_json(self.endpoint_with("search-item", pairs)?).await
    }

    // =========================================================================
    // Delivery
    // =========================================================================

    /// Location groups serving `pincode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn location_groups_for_pincode(
        &self,
        pincode: &str,
    ) -> Result<Vec<LocationGroup>, StoreApiError> {
        let url = self.endpoint(&format!(
            "location-group/pincode={}",
            urlencoding::encode(pincode)
        ))?;
        Ok(self.get_optional(url).await?.unwrap_or_default())
    }

    /// Location group by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn location_group(&self, id: &LocationGroupId) -> Result<LocationGroup, StoreApiError> {
        self.get_json(self.endpoint(&format!(
            "location-group/{}",
            urlencoding::encode(id.as_str())
        ))?)
        .await
    }

    /// All locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn locations(&self) -> Result<Vec<Location>, StoreApiError> {
        self.get_json(self.endpoint("location")?).await
    }

    /// Locations with `pincode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn locations_for_pincode(&self, pincode: &str) -> Result<Vec<Location>, StoreApiError> {
        let url = self.endpoint(&format!("location/pincode={}", urlencoding::encode(pincode)))?;
        Ok(self.get_optional(url).await?.unwrap_or_default())
    }

    /// Location by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn location(&self, id: &LocationId) -> Result<Location, StoreApiError> {
        self.get_json(self.endpoint(&format!("location/{}", urlencoding::encode(id.as_str())))?)
            .await
    }

    // =========================================================================
    // Orders and promotions
    // =========================================================================

    /// All coupons.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn coupons(&self) -> Result<Vec<Coupon>, StoreApiError> {
        self.get_json(self.endpoint("coupons")?).await
    }

    /// Invoice for an order, `None` if the order is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn invoice(&self, order_id: &OrderId) -> Result<Option<InvoiceData>, StoreApiError> {
        self.get_optional(self.endpoint(&format!(
            "orders/invoice/{}",
            urlencoding::encode(order_id.as_str())
        ))?)
        .await
    }

    /// Cheap reachability probe for readiness checks.
    ///
    /// # Errors
    ///
    /// Returns an error if the store API cannot be reached or answers with a failure.
    pub async fn ping(&self) -> Result<(), StoreApiError> {
        let url = self.endpoint("sizes")?;
        let (status, body) = self.send(self.inner.client.get(url.clone())).await?;
        Self::check_status(&url, status, &body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> StoreClient {
        StoreClient::new(&StoreApiConfig {
            base_url: Url::parse("https://store.example").unwrap(),
            store_id: StoreId::new("684315296fa373b59468f387"),
            cache_ttl: Duration::from_secs(600),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_is_scoped_to_store() {
        let url = client().endpoint("categories").unwrap();
        assert_eq!(
            url.as_str(),
            "https://store.example/api/admin/684315296fa373b59468f387/categories"
        );
    }

    #[test]
    fn test_endpoint_with_encodes_pairs() {
        let url = client()
            .endpoint_with("products", [("slug", "linen shirt&co")])
            .unwrap();
        assert_eq!(url.query(), Some("slug=linen+shirt%26co"));
    }

    #[test]
    fn test_endpoint_with_no_pairs_has_no_query() {
        let url = client()
            .endpoint_with("products", Vec::<(&str, &str)>::new())
            .unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_pincode_path() {
        let url = client().endpoint("location-group/pincode=110040").unwrap();
        assert!(url.path().ends_with("/location-group/pincode=110040"));
    }
}
