//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// First letter upper-cased, the rest lower-cased.
///
/// Usage in templates: `{{ category.name|capitalize_first }}`
#[askama::filter_fn]
pub fn capitalize_first(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(favobliss_core::filters::capitalize(&value.to_string()))
}

/// Rating with one decimal, e.g. `4.3`.
///
/// Usage in templates: `{{ rating|rating }}`
#[askama::filter_fn]
pub fn rating(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    Ok(raw
        .parse::<f32>()
        .map_or(raw, |r| format!("{:.1}", r.clamp(0.0, 5.0))))
}
