//! Product page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use favobliss_core::FALLBACK_PINCODE;

use super::shopper_location;
use super::views::{ProductCard, cards};
use crate::error::add_breadcrumb;
use crate::filters;
use crate::services::product_page::{self, ProductPage, ProductPageOutcome};
use crate::state::AppState;

/// One gallery slide.
#[derive(Debug, Clone)]
pub struct Slide {
    pub id: String,
    pub url: String,
    pub is_video: bool,
    /// Adjacent to the active slide, so loaded eagerly.
    pub eager: bool,
    pub active: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub title: String,
    pub page: ProductPage,
    pub slides: Vec<Slide>,
    pub related: Vec<ProductCard>,
}

impl From<ProductPage> for ProductShowTemplate {
    fn from(page: ProductPage) -> Self {
        let gallery = &page.gallery;
        let slides = gallery
            .media()
            .iter()
            .enumerate()
            .map(|(i, m)| Slide {
                id: m.id.to_string(),
                url: m.url.clone(),
                is_video: m.is_video(),
                eager: gallery.should_load(i),
                active: i == gallery.active_index(),
            })
            .collect();
        let related = cards(&page.related, page.delivery.group_id.as_ref());
        Self {
            title: page.meta.title.clone(),
            slides,
            related,
            page,
        }
    }
}

/// Display a product page by variant slug.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Response {
    let chosen = shopper_location(&session).await;
    let pincode = chosen
        .as_ref()
        .map_or(FALLBACK_PINCODE, |l| l.pincode.as_str());

    match product_page::load(state.store(), &slug, pincode).await {
        ProductPageOutcome::RedirectHome => Redirect::to("/").into_response(),
        ProductPageOutcome::Found(page) => {
            add_breadcrumb("navigation", "Viewed product page", &[("slug", &slug)]);
            ProductShowTemplate::from(*page).into_response()
        }
    }
}
