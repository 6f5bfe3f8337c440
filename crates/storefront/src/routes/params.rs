//! URL query parameters for listing and search pages.

use serde::{Deserialize, Deserializer};

use favobliss_core::{BrandId, ColorId, SizeId, SubCategoryId};

use crate::store_api::ProductQuery;

/// Deserialize empty strings as None for optional numeric fields.
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Filter sidebar and paging parameters, as links and forms send them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    /// Free-text query (search page only).
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub limit: Option<u32>,
    #[serde(default)]
    pub color_id: Option<String>,
    #[serde(default)]
    pub size_id: Option<String>,
    #[serde(default)]
    pub brand_id: Option<String>,
    #[serde(default, rename = "sub")]
    pub sub_category_id: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub discount: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_owned)
}

impl FilterParams {
    /// The trimmed search text, empty when absent.
    #[must_use]
    pub fn search_text(&self) -> String {
        non_blank(self.query.as_ref()).unwrap_or_default()
    }

    /// Store API query for these parameters.
    #[must_use]
    pub fn to_query(&self) -> ProductQuery {
        ProductQuery {
            color_id: non_blank(self.color_id.as_ref()).map(ColorId::new),
            size_id: non_blank(self.size_id.as_ref()).map(SizeId::new),
            brand_id: non_blank(self.brand_id.as_ref()).map(BrandId::new),
            sub_category_id: non_blank(self.sub_category_id.as_ref()).map(SubCategoryId::new),
            price: non_blank(self.price.as_ref()),
            rating: non_blank(self.rating.as_ref()),
            discount: non_blank(self.discount.as_ref()),
            page: self.page,
            limit: self.limit,
            ..ProductQuery::default()
        }
    }
}
