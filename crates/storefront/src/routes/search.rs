//! Search route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use favobliss_core::filters::Breadcrumbs;

use super::params::FilterParams;
use super::views::{PageLink, ProductCard, cards, page_links, query_with_page};
use super::{delivery_for, shopper_location};
use crate::filters;
use crate::services::facets::Facets;
use crate::services::search::{self, SearchOutcome, SearchRequest};
use crate::state::AppState;

/// Search page title.
pub const SEARCH_TITLE: &str = "Search Result | Get Deals, Shop Now!";

/// Search page template. `searched` is false for a blank query.
#[derive(Template, WebTemplate)]
#[template(path = "pages/search.html")]
pub struct SearchTemplate {
    pub title: String,
    pub filter_action: String,
    pub query: String,
    pub searched: bool,
    pub products: Vec<ProductCard>,
    pub total_products: u32,
    pub facets: Facets,
    pub pages: Vec<PageLink>,
    pub breadcrumbs: Breadcrumbs,
}

impl SearchTemplate {
    fn empty() -> Self {
        Self {
            title: SEARCH_TITLE.to_owned(),
            filter_action: "/search".to_owned(),
            query: String::new(),
            searched: false,
            products: Vec::new(),
            total_products: 0,
            facets: Facets::default(),
            pages: Vec::new(),
            breadcrumbs: Breadcrumbs::new(),
        }
    }
}

/// Display search results.
#[instrument(skip(state, session, params))]
pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<FilterParams>,
) -> impl IntoResponse {
    let filters = params.to_query();
    let request = SearchRequest {
        query: params.search_text(),
        page: params.page.unwrap_or(1),
        filters: filters.clone(),
    };

    let page = match search::load(state.store(), request).await {
        SearchOutcome::NoQuery => return SearchTemplate::empty(),
        SearchOutcome::Results(page) => *page,
    };

    let chosen = shopper_location(&session).await;
    let delivery = delivery_for(chosen, &page.location_groups);

    let mut pairs = vec![("query", page.query.clone())];
    pairs.extend(filters.to_pairs());
    let pages = page_links(page.page, page.total_pages, |n| {
        format!("/search?{}", query_with_page(&pairs, n))
    });

    SearchTemplate {
        title: SEARCH_TITLE.to_owned(),
        filter_action: "/search".to_owned(),
        searched: true,
        products: cards(&page.products, delivery.group_id.as_ref()),
        total_products: page.total_products,
        facets: page.facets,
        pages,
        breadcrumbs: page.breadcrumbs,
        query: page.query,
    }
}
