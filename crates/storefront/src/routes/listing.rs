//! Category and brand listing route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use favobliss_core::DeliveryLocation;
use favobliss_core::filters::Breadcrumbs;

use super::params::FilterParams;
use super::views::{PageLink, ProductCard, cards, page_links, query_with_page};
use super::{delivery_for, not_found, shopper_location};
use crate::error::Result;
use crate::filters;
use crate::services::facets::Facets;
use crate::services::listing::{self, ListingPage};
use crate::state::AppState;

/// Listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/listing.html")]
pub struct ListingTemplate {
    pub title: String,
    pub banner: Option<String>,
    /// Path the filter form submits to.
    pub filter_action: String,
    /// Always empty; listings have no free-text query.
    pub query: String,
    pub products: Vec<ProductCard>,
    pub total_products: u32,
    pub facets: Facets,
    pub pages: Vec<PageLink>,
    pub breadcrumbs: Breadcrumbs,
}

impl ListingTemplate {
    fn new(page: ListingPage, base_path: String, chosen: Option<DeliveryLocation>) -> Self {
        let delivery = delivery_for(chosen, &page.location_groups);
        // The subject is already in the path.
        let mut pairs = page.query.to_pairs();
        pairs.retain(|(k, _)| *k != "categoryId");
        let pages = page_links(page.page, page.total_pages, |n| {
            format!("{base_path}?{}", query_with_page(&pairs, n))
        });
        Self {
            title: page.subject.name().to_owned(),
            banner: page.subject.banner().map(str::to_owned),
            products: cards(&page.products, delivery.group_id.as_ref()),
            total_products: page.total_products,
            facets: page.facets,
            pages,
            breadcrumbs: page.breadcrumbs,
            filter_action: base_path,
            query: String::new(),
        }
    }
}

/// Display a category listing.
#[instrument(skip(state, session, params))]
pub async fn category(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    Query(params): Query<FilterParams>,
) -> Result<Response> {
    let chosen = shopper_location(&session).await;
    let base_path = format!("/category/{slug}");
    Ok(
        match listing::category(state.store(), &slug, params.to_query()).await? {
            Some(page) => ListingTemplate::new(page, base_path, chosen).into_response(),
            None => not_found::page("We could not find that category.").into_response(),
        },
    )
}

/// Display a brand listing.
#[instrument(skip(state, session, params))]
pub async fn brand(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    Query(params): Query<FilterParams>,
) -> Result<Response> {
    let chosen = shopper_location(&session).await;
    let base_path = format!("/brand/{slug}");
    Ok(
        match listing::brand(state.store(), &slug, params.to_query()).await? {
            Some(page) => ListingTemplate::new(page, base_path, chosen).into_response(),
            None => not_found::page("We could not find that brand.").into_response(),
        },
    )
}
