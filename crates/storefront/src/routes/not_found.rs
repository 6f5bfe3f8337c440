//! 404 page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{http::StatusCode, response::IntoResponse};

use crate::filters;

/// Not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundTemplate {
    pub title: String,
    pub message: String,
}

impl NotFoundTemplate {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: "Page Not Found".to_owned(),
            message: message.into(),
        }
    }
}

/// Render the 404 page with `message`.
pub fn page(message: impl Into<String>) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate::new(message))
}

/// Router fallback.
pub async fn not_found() -> impl IntoResponse {
    page("The page you are looking for does not exist.")
}
