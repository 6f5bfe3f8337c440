//! Home page aggregation.

use tracing::instrument;

use favobliss_core::{Brand, Category, LocationGroup, Product, SubCategory};

use super::or_fallback;
use crate::config::HomeConfig;
use crate::store_api::{ProductQuery, StoreClient, TimeFrame};

/// Products in the hot deals row.
const HOT_DEALS_LIMIT: u32 = 10;

/// Everything the home template needs. Every row may be empty.
#[derive(Debug, Clone, Default)]
pub struct HomePage {
    pub latest: Vec<Product>,
    pub featured: Vec<Product>,
    pub hot_deals: Vec<Product>,
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
    pub location_groups: Vec<LocationGroup>,
    /// Sub-categories of the configured highlight category.
    pub highlight_subcategories: Vec<SubCategory>,
    /// Products of the configured highlight brand.
    pub brand_products: Vec<Product>,
}

/// Load the home page. Never fails; rows that cannot be fetched are empty.
#[instrument(skip_all)]
pub async fn load(client: &StoreClient, home: &HomeConfig) -> HomePage {
    let latest_query = ProductQuery::new();
    let featured_query = ProductQuery::new().featured();

    let highlight_subcategories = async {
        match &home.featured_category {
            Some(id) => or_fallback("highlight subcategories", client.subcategories(id).await),
            None => Vec::new(),
        }
    };
    let brand_products = async {
        match &home.featured_brand {
            Some(id) => {
                let query = ProductQuery::new().brand(id.clone());
                or_fallback("brand products", client.products(&query).await).products
            }
            None => Vec::new(),
        }
    };

    let (
        latest,
        featured,
        hot_deals,
        categories,
        brands,
        groups,
        highlight_subcategories,
        brand_products,
    ) = tokio::join!(
        client.products(&latest_query),
        client.products(&featured_query),
        client.hot_deals(None, HOT_DEALS_LIMIT, TimeFrame::Month),
        client.categories(),
        client.brands(),
        client.location_groups(),
        highlight_subcategories,
        brand_products,
    );

    HomePage {
        latest: or_fallback("latest products", latest).products,
        featured: or_fallback("featured products", featured).products,
        hot_deals: or_fallback("hot deals", hot_deals),
        categories: or_fallback("categories", categories),
        brands: or_fallback("brands", brands),
        location_groups: or_fallback("location groups", groups),
        highlight_subcategories,
        brand_products,
    }
}
