//! Category and brand listing pages.

use tracing::instrument;

use favobliss_core::filters::{Breadcrumbs, total_pages};
use favobliss_core::{Brand, Category, CategoryClassification, LocationGroup, Product};

use super::facets::Facets;
use super::or_fallback;
use crate::store_api::{ProductQuery, StoreApiError, StoreClient};

/// Products per listing page unless the URL says otherwise.
pub const LISTING_PAGE_SIZE: u32 = 12;

/// What a listing page is about.
#[derive(Debug, Clone)]
pub enum ListingSubject {
    Category(Category),
    Brand(Brand),
}

impl ListingSubject {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Category(c) => &c.name,
            Self::Brand(b) => &b.name,
        }
    }

    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        match self {
            Self::Category(c) => c
                .landing_page_banner
                .as_deref()
                .or(Some(c.banner_image.as_str()))
                .filter(|b| !b.is_empty()),
            Self::Brand(b) => b.banner_image.as_deref(),
        }
    }

    fn path(&self) -> String {
        match self {
            Self::Category(c) => format!("/category/{}", c.slug),
            Self::Brand(b) => format!("/brand/{}", b.slug),
        }
    }
}

/// A filtered, paginated listing.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub subject: ListingSubject,
    pub products: Vec<Product>,
    pub total_products: u32,
    pub page: u32,
    pub total_pages: u32,
    pub facets: Facets,
    pub location_groups: Vec<LocationGroup>,
    pub breadcrumbs: Breadcrumbs,
    /// The filters in effect, for rebuilding pagination links.
    pub query: ProductQuery,
}

/// Load a category listing. `Ok(None)` when the slug is unknown.
///
/// # Errors
///
/// Returns an error if the category lookup itself fails.
#[instrument(skip(client, query))]
pub async fn category(
    client: &StoreClient,
    slug: &str,
    query: ProductQuery,
) -> Result<Option<ListingPage>, StoreApiError> {
    let Some(category) = client.category_by_slug(slug).await? else {
        return Ok(None);
    };
    let classification = category.classification.clone().unwrap_or_default();
    let query = ProductQuery {
        category_id: Some(category.id.clone()),
        ..query
    };
    Ok(Some(
        load(client, ListingSubject::Category(category), &classification, query).await,
    ))
}

/// Load a brand listing. `Ok(None)` when the slug is unknown.
///
/// # Errors
///
/// Returns an error if the brand lookup itself fails.
#[instrument(skip(client, query))]
pub async fn brand(
    client: &StoreClient,
    slug: &str,
    query: ProductQuery,
) -> Result<Option<ListingPage>, StoreApiError> {
    let Some(brand) = client.brand_by_slug(slug).await? else {
        return Ok(None);
    };
    let query = ProductQuery {
        brand_id: Some(brand.id.clone()),
        ..query
    };
    Ok(Some(
        load(
            client,
            ListingSubject::Brand(brand),
            &CategoryClassification::Topwear,
            query,
        )
        .await,
    ))
}

async fn load(
    client: &StoreClient,
    subject: ListingSubject,
    classification: &CategoryClassification,
    query: ProductQuery,
) -> ListingPage {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.filter(|l| *l > 0).unwrap_or(LISTING_PAGE_SIZE);
    let query = ProductQuery {
        page: Some(page),
        limit: Some(limit),
        ..query
    };

    let (products, sizes, colors, brands, groups) = tokio::join!(
        client.products(&query),
        client.sizes(),
        client.colors(),
        client.brands(),
        client.location_groups(),
    );

    let products = or_fallback("listing products", products);
    let facets = Facets::build(
        classification,
        or_fallback("sizes", sizes),
        or_fallback("colors", colors),
        or_fallback("brands", brands),
    );
    let breadcrumbs = Breadcrumbs::new().push(subject.name(), Some(subject.path()));

    ListingPage {
        products: products.products,
        total_products: products.total_count,
        page,
        total_pages: total_pages(products.total_count, limit),
        facets,
        location_groups: or_fallback("location groups", groups),
        breadcrumbs,
        subject,
        query,
    }
}
