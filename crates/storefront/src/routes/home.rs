//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use favobliss_core::{Brand, Category, SubCategory};

use super::{delivery_for, shopper_location};
use super::views::{ProductRow, cards};
use crate::filters;
use crate::services::home;
use crate::state::AppState;

/// Site title used on the home page.
pub const SITE_TITLE: &str = "Favobliss | Your One-Stop Shop for the Latest Electronics";

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
    pub highlight_subcategories: Vec<SubCategory>,
    /// Product rows in display order; empty rows are skipped.
    pub rows: Vec<ProductRow>,
}

/// Display the home page.
#[instrument(skip_all)]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let chosen = shopper_location(&session).await;
    let page = home::load(state.store(), &state.config().home).await;
    let delivery = delivery_for(chosen, &page.location_groups);
    let group = delivery.group_id.as_ref();

    HomeTemplate {
        title: SITE_TITLE.to_owned(),
        rows: vec![
            ProductRow::new("Top Picks", cards(&page.brand_products, group)),
            ProductRow::new("Latest Launches", cards(&page.latest, group)),
            ProductRow::new("Favobliss Choice", cards(&page.featured, group)),
            ProductRow::new("Hot Deals", cards(&page.hot_deals, group)),
        ],
        categories: page.categories,
        brands: page.brands,
        highlight_subcategories: page.highlight_subcategories,
    }
}
