//! Product listing query.

use serde::{Deserialize, Serialize};

use favobliss_core::{BrandId, CategoryId, ColorId, SizeId, SubCategoryId, VariantId};

/// Filters accepted by `GET products` and `GET search-item`.
///
/// Doubles as the query-string extractor for listing pages, so the same keys
/// flow from the shopper's URL through to the store API. Unset fields are
/// left out of the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_id: Option<ColorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_id: Option<SizeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category_id: Option<SubCategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<BrandId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    /// `min-max` or `min` (see `favobliss_core::filters::price_ranges`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Comma-separated variant ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_ids: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
}

impl ProductQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn category(mut self, id: CategoryId) -> Self {
        self.category_id = Some(id);
        self
    }

    #[must_use]
    pub fn sub_category(mut self, id: SubCategoryId) -> Self {
        self.sub_category_id = Some(id);
        self
    }

    #[must_use]
    pub fn brand(mut self, id: BrandId) -> Self {
        self.brand_id = Some(id);
        self
    }

    /// Only featured products. `isFeatured=false` is never sent.
    #[must_use]
    pub fn featured(mut self) -> Self {
        self.is_featured = Some(true);
        self
    }

    #[must_use]
    pub fn variants(mut self, ids: &[VariantId]) -> Self {
        if !ids.is_empty() {
            self.variant_ids = Some(
                ids.iter()
                    .map(VariantId::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }
        self
    }

    #[must_use]
    pub fn pincode(mut self, pincode: impl Into<String>) -> Self {
        self.pincode = Some(pincode.into());
        self
    }

    /// Key/value pairs for the request, blank values dropped.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                pairs.push((key, v));
            }
        };
        push("colorId", self.color_id.as_ref().map(ToString::to_string));
        push("sizeId", self.size_id.as_ref().map(ToString::to_string));
        push("categoryId", self.category_id.as_ref().map(ToString::to_string));
        push("brandId", self.brand_id.as_ref().map(ToString::to_string));
        push("isFeatured", self.is_featured.filter(|f| *f).map(|f| f.to_string()));
        push("limit", self.limit.map(|l| l.to_string()));
        push("type", self.product_type.clone());
        push("price", self.price.clone());
        push("page", self.page.map(|p| p.to_string()));
        push("variantIds", self.variant_ids.clone());
        push("pincode", self.pincode.clone());
        push(
            "subCategoryId",
            self.sub_category_id.as_ref().map(ToString::to_string),
        );
        push("rating", self.rating.clone());
        push("discount", self.discount.clone());
        pairs
    }

    /// Whether any shopper-selectable filter is set (paging aside).
    #[must_use]
    pub const fn has_filters(&self) -> bool {
        self.color_id.is_some()
            || self.size_id.is_some()
            || self.price.is_some()
            || self.rating.is_some()
            || self.discount.is_some()
    }
}
