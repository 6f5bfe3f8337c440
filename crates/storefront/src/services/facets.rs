//! Filter sidebar data shared by search and listing pages.

use favobliss_core::filters::{
    FacetOption, discount_options, price_ranges, rating_options, sizes_for,
};
use favobliss_core::{Brand, CategoryClassification, Color, Size};

/// Options shown in the filter sidebar.
#[derive(Debug, Clone, Default)]
pub struct Facets {
    pub sizes: Vec<Size>,
    pub colors: Vec<Color>,
    pub brands: Vec<Brand>,
    pub prices: Vec<FacetOption>,
    pub ratings: Vec<FacetOption>,
    pub discounts: Vec<FacetOption>,
}

impl Facets {
    /// Build facets, keeping only the sizes that fit `classification`.
    #[must_use]
    pub fn build(
        classification: &CategoryClassification,
        sizes: Vec<Size>,
        colors: Vec<Color>,
        brands: Vec<Brand>,
    ) -> Self {
        let valid = sizes_for(classification);
        Self {
            sizes: sizes
                .into_iter()
                .filter(|s| valid.contains(&s.name.as_str()))
                .collect(),
            colors,
            brands,
            prices: price_ranges(),
            ratings: rating_options(),
            discounts: discount_options(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sizes() -> Vec<Size> {
        serde_json::from_value(json!([
            {"id": "s1", "name": "M", "value": "M"},
            {"id": "s2", "name": "9", "value": "9"},
            {"id": "s3", "name": "XXL", "value": "XXL"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_sizes_filtered_by_classification() {
        let facets = Facets::build(&CategoryClassification::Topwear, sizes(), vec![], vec![]);
        let names: Vec<_> = facets.sizes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["M", "XXL"]);

        let facets = Facets::build(&CategoryClassification::Footwear, sizes(), vec![], vec![]);
        assert_eq!(facets.sizes.len(), 1);

        let facets = Facets::build(&CategoryClassification::Skincare, sizes(), vec![], vec![]);
        assert!(facets.sizes.is_empty());
        assert_eq!(facets.prices.len(), 5);
    }
}
