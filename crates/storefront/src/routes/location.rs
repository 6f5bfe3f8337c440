//! Delivery location handler.

use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header::REFERER},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use favobliss_core::resolve_pincode;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::session::set_delivery_location;
use crate::state::AppState;

/// Pincode form.
#[derive(Debug, Deserialize)]
pub struct LocationForm {
    pub pincode: String,
}

/// Indian postal codes are six digits.
fn is_valid_pincode(pincode: &str) -> bool {
    pincode.len() == 6 && pincode.bytes().all(|b| b.is_ascii_digit())
}

/// Same-site path to return to, taken from `Referer`.
fn return_path(headers: &HeaderMap) -> String {
    headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|r| url::Url::parse(r).ok())
        .map(|u| match u.query() {
            Some(q) => format!("{}?{q}", u.path()),
            None => u.path().to_owned(),
        })
        .filter(|p| p.starts_with('/') && !p.starts_with("//"))
        .unwrap_or_else(|| "/".to_owned())
}

/// Resolve the submitted pincode, remember it in the session and go back.
///
/// Pincodes no location group serves fall back to the default location.
#[instrument(skip(state, session, headers, form))]
pub async fn set_location(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<LocationForm>,
) -> Result<Redirect> {
    let pincode = form.pincode.trim();
    if !is_valid_pincode(pincode) {
        return Err(AppError::BadRequest(
            "Please enter a valid 6-digit pincode".to_owned(),
        ));
    }

    let groups = state.store().location_groups().await?;
    let location = resolve_pincode(&groups, pincode);
    if location.is_fallback {
        tracing::info!(pincode, "Pincode not serviceable, using fallback location");
    }
    set_delivery_location(&session, &location).await?;
    add_breadcrumb("location", "Set delivery pincode", &[("pincode", pincode)]);

    Ok(Redirect::to(&return_path(&headers)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_pincode_validation() {
        assert!(is_valid_pincode("110040"));
        assert!(!is_valid_pincode("11004"));
        assert!(!is_valid_pincode("11004a"));
    }

    #[test]
    fn test_return_path_uses_referer_path() {
        let mut headers = HeaderMap::new();
        headers.insert(
            REFERER,
            HeaderValue::from_static("https://favobliss.com/linen-shirt-blue?ref=home"),
        );
        assert_eq!(return_path(&headers), "/linen-shirt-blue?ref=home");
    }

    #[test]
    fn test_return_path_defaults_home() {
        assert_eq!(return_path(&HeaderMap::new()), "/");
    }
}
