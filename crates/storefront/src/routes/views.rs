//! Display models shared by page templates.

use favobliss_core::{LocationGroupId, Price, Product};

use crate::services::product_page::PLACEHOLDER_IMAGE;

/// A product tile in a grid or carousel.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub name: String,
    /// Link to the lead variant's page.
    pub href: String,
    pub image: String,
    pub price: Option<Price>,
    pub mrp: Option<Price>,
    /// Whole-percent discount; 0 hides the badge.
    pub discount: u8,
    pub rating: Option<f32>,
    pub in_stock: bool,
}

impl ProductCard {
    /// Card for `product`, priced for `group`. `None` when the product has no
    /// variant to link to.
    #[must_use]
    pub fn from_product(product: &Product, group: Option<&LocationGroupId>) -> Option<Self> {
        let variant = product.lead_variant()?;
        let price = variant.price_for_group(group);
        Some(Self {
            name: if variant.name.is_empty() {
                product.name.clone()
            } else {
                variant.name.clone()
            },
            href: format!("/{}", variant.slug),
            image: variant
                .primary_image()
                .map_or_else(|| PLACEHOLDER_IMAGE.to_owned(), |m| m.url.clone()),
            price: price.map(|p| p.price),
            mrp: price.filter(|p| p.mrp > p.price).map(|p| p.mrp),
            discount: price.map_or(0, favobliss_core::VariantPrice::discount),
            rating: product.average_rating.filter(|r| *r > 0.0),
            in_stock: variant.in_stock(),
        })
    }
}

/// A titled row of cards.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub title: String,
    pub cards: Vec<ProductCard>,
}

impl ProductRow {
    #[must_use]
    pub fn new(title: impl Into<String>, cards: Vec<ProductCard>) -> Self {
        Self {
            title: title.into(),
            cards,
        }
    }
}

/// Cards for every product that has a variant.
#[must_use]
pub fn cards(products: &[Product], group: Option<&LocationGroupId>) -> Vec<ProductCard> {
    products
        .iter()
        .filter_map(|p| ProductCard::from_product(p, group))
        .collect()
}

/// A numbered link in a pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub href: String,
    pub current: bool,
}

/// Links for pages `1..=total_pages`, built by `href_for`.
#[must_use]
pub fn page_links(
    current: u32,
    total_pages: u32,
    href_for: impl Fn(u32) -> String,
) -> Vec<PageLink> {
    (1..=total_pages)
        .map(|number| PageLink {
            number,
            href: href_for(number),
            current: number == current,
        })
        .collect()
}

/// Rebuild a query string from pairs, replacing `page`.
#[must_use]
pub fn query_with_page(pairs: &[(&str, String)], page: u32) -> String {
    let mut out = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs.iter().filter(|(k, _)| *k != "page") {
        out.append_pair(k, v);
    }
    out.append_pair("page", &page.to_string());
    out.finish()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product() -> Product {
        serde_json::from_value(json!({
            "id": "p1",
            "name": "Linen Shirt",
            "slug": "linen-shirt",
            "averageRating": 4.4,
            "variants": [{
                "id": "v1",
                "productId": "p1",
                "name": "Linen Shirt Blue",
                "slug": "linen-shirt-blue",
                "stock": 0,
                "variantPrices": [
                    {"price": 999, "mrp": 1499, "locationGroupId": "g1"}
                ]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_card_links_to_lead_variant() {
        let card = ProductCard::from_product(&product(), None).unwrap();
        assert_eq!(card.href, "/linen-shirt-blue");
        assert_eq!(card.image, PLACEHOLDER_IMAGE);
        assert_eq!(card.discount, 33);
        assert!(!card.in_stock);
        assert!(card.mrp.is_some());
    }

    #[test]
    fn test_products_without_variants_are_skipped() {
        let bare: Product =
            serde_json::from_value(json!({"id": "p2", "slug": "bare"})).unwrap();
        assert_eq!(cards(&[product(), bare], None).len(), 1);
    }

    #[test]
    fn test_query_with_page_replaces_page() {
        let pairs = vec![("colorId", "c1".to_owned()), ("page", "3".to_owned())];
        assert_eq!(query_with_page(&pairs, 4), "colorId=c1&page=4");
    }

    #[test]
    fn test_page_links_mark_current() {
        let links = page_links(2, 3, |n| format!("?page={n}"));
        assert_eq!(links.len(), 3);
        assert!(links[1].current);
        assert_eq!(links[2].href, "?page=3");
    }
}
