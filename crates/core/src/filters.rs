//! Search and listing facets.
//!
//! The facet values are fixed; only the size list depends on what is being
//! browsed.

use serde::Serialize;

use crate::types::CategoryClassification;

/// A selectable facet value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    /// Value sent to the store API.
    pub value: String,
    /// Label shown to the shopper.
    pub label: String,
}

impl FacetOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

const APPAREL_SIZES: [&str; 5] = ["S", "M", "L", "XL", "XXL"];
const INNERWEAR_SIZES: [&str; 4] = ["S", "M", "L", "XL"];
const FOOTWEAR_SIZES: [&str; 6] = ["6", "7", "8", "9", "10", "11"];

/// Size options offered for a classification. Beauty lines have none.
#[must_use]
pub fn sizes_for(classification: &CategoryClassification) -> &'static [&'static str] {
    match classification {
        CategoryClassification::Topwear | CategoryClassification::Bottomwear => &APPAREL_SIZES,
        CategoryClassification::Footwear => &FOOTWEAR_SIZES,
        CategoryClassification::InnerwearAndSleepwear => &INNERWEAR_SIZES,
        _ => &[],
    }
}

/// Price bands in rupees. The last band is open-ended.
const PRICE_BANDS: [(u32, Option<u32>); 5] = [
    (0, Some(5000)),
    (5000, Some(10000)),
    (10000, Some(30000)),
    (30000, Some(80000)),
    (80000, None),
];

/// Price range facet. Values are `min-max`, or `min` for the open band.
#[must_use]
pub fn price_ranges() -> Vec<FacetOption> {
    PRICE_BANDS
        .iter()
        .map(|&(min, max)| match max {
            Some(max) => FacetOption::new(format!("{min}-{max}"), format!("Rs. {min} to Rs. {max}")),
            None => FacetOption::new(min.to_string(), format!("Above Rs. {min}")),
        })
        .collect()
}

/// Minimum rating facet, best first.
#[must_use]
pub fn rating_options() -> Vec<FacetOption> {
    (1..=4)
        .rev()
        .map(|r| FacetOption::new(r.to_string(), format!("{r}★ & above")))
        .collect()
}

/// Minimum discount facet, 70% down to 10%.
#[must_use]
pub fn discount_options() -> Vec<FacetOption> {
    (1..=7)
        .rev()
        .map(|d| d * 10)
        .map(|d| FacetOption::new(d.to_string(), format!("{d}% and above")))
        .collect()
}

/// Number of pages needed for `total` items at `limit` per page.
#[must_use]
pub const fn total_pages(total: u32, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

/// One breadcrumb. The last crumb usually has no link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub href: Option<String>,
}

/// Breadcrumb trail that always starts at Home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumbs(Vec<Breadcrumb>);

impl Default for Breadcrumbs {
    fn default() -> Self {
        Self(vec![Breadcrumb {
            label: "Home".to_owned(),
            href: Some("/".to_owned()),
        }])
    }
}

impl Breadcrumbs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a crumb. Labels are shown with only their first letter upper-cased.
    #[must_use]
    pub fn push(mut self, label: &str, href: Option<String>) -> Self {
        self.0.push(Breadcrumb {
            label: capitalize(label),
            href,
        });
        self
    }

    /// Append a crumb with its label as given.
    #[must_use]
    pub fn push_verbatim(mut self, label: impl Into<String>, href: Option<String>) -> Self {
        self.0.push(Breadcrumb {
            label: label.into(),
            href,
        });
        self
    }

    #[must_use]
    pub fn items(&self) -> &[Breadcrumb] {
        &self.0
    }
}

/// First character upper-cased, the rest lower-cased.
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_for_classification() {
        assert_eq!(sizes_for(&CategoryClassification::Topwear), &["S", "M", "L", "XL", "XXL"]);
        assert_eq!(sizes_for(&CategoryClassification::Bottomwear).len(), 5);
        assert_eq!(sizes_for(&CategoryClassification::Footwear).first(), Some(&"6"));
        assert_eq!(sizes_for(&CategoryClassification::Footwear).last(), Some(&"11"));
        assert_eq!(sizes_for(&CategoryClassification::InnerwearAndSleepwear), &["S", "M", "L", "XL"]);
        assert!(sizes_for(&CategoryClassification::Fragrances).is_empty());
        assert!(sizes_for(&CategoryClassification::Other("EYEWEAR".into())).is_empty());
    }

    #[test]
    fn test_price_ranges() {
        let ranges = price_ranges();
        assert_eq!(ranges.len(), 5);
        assert_eq!(ranges[0].value, "0-5000");
        assert_eq!(ranges[3].value, "30000-80000");
        assert_eq!(ranges[4].value, "80000");
        assert_eq!(ranges[4].label, "Above Rs. 80000");
    }

    #[test]
    fn test_rating_and_discount_options() {
        let ratings: Vec<_> = rating_options().into_iter().map(|o| o.value).collect();
        assert_eq!(ratings, ["4", "3", "2", "1"]);

        let discounts: Vec<_> = discount_options().into_iter().map(|o| o.value).collect();
        assert_eq!(discounts, ["70", "60", "50", "40", "30", "20", "10"]);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_breadcrumbs_capitalize() {
        let crumbs = Breadcrumbs::new()
            .push("MEN", Some("/category/men".to_owned()))
            .push("linen SHIRT", None);
        let labels: Vec<_> = crumbs.items().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Home", "Men", "Linen shirt"]);
        assert_eq!(crumbs.items()[0].href.as_deref(), Some("/"));
    }

    #[test]
    fn test_push_verbatim_keeps_case() {
        let crumbs = Breadcrumbs::new().push_verbatim("LINEN SHIRT", None);
        assert_eq!(crumbs.items()[1].label, "LINEN SHIRT");
    }

    #[test]
    fn test_capitalize_empty() {
        assert_eq!(capitalize(""), "");
    }
}
