//! Product detail page aggregation.

use chrono::Utc;
use tracing::instrument;

use favobliss_core::gallery::Gallery;
use favobliss_core::{
    Coupon, DeliveryInfo, DeliveryLocation, LocationGroup, Product, ProductApiResponse,
    ProductList, ProductSpecification, Variant, VariantPrice, VariantSummary, find_group,
    resolve_pincode,
};

use super::or_fallback;
use crate::store_api::{ProductQuery, StoreApiError, StoreClient};

/// Products fetched for the "you may also like" rows.
pub const SIBLING_LIMIT: u32 = 10;

/// Shown when a variant has no images and no Open Graph image.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-image.jpg";

const OG_IMAGE_WIDTH: u32 = 900;
const OG_IMAGE_HEIGHT: u32 = 1200;

/// Open Graph image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OgImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

/// Head metadata for a product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub og_image: Option<OgImage>,
}

impl PageMeta {
    /// Metadata for a variant. Variant fields win over product fields.
    #[must_use]
    pub fn for_variant(variant: &Variant, product: &Product) -> Self {
        let title = non_blank(variant.meta_title.as_deref())
            .or_else(|| non_blank(product.meta_title.as_deref()))
            .unwrap_or_else(|| format!("Buy {}", variant.name));

        let description = non_blank(variant.meta_description.as_deref())
            .or_else(|| non_blank(product.meta_description.as_deref()))
            .or_else(|| non_blank(variant.description.as_deref()))
            .or_else(|| non_blank(product.description.as_deref()))
            .unwrap_or_default();

        let keywords = if variant.meta_keywords.is_empty() {
            product.meta_keywords.clone()
        } else {
            variant.meta_keywords.clone()
        };

        let url = variant
            .open_graph_image
            .clone()
            .or_else(|| variant.images.first().map(|m| m.url.clone()))
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_owned());

        Self {
            og_image: Some(OgImage {
                url,
                width: OG_IMAGE_WIDTH,
                height: OG_IMAGE_HEIGHT,
                alt: title.clone(),
            }),
            title,
            description,
            keywords,
        }
    }

    /// Metadata used when the slug does not resolve.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            title: "Product Not Found".to_owned(),
            description: "The requested product is not available.".to_owned(),
            keywords: Vec::new(),
            og_image: None,
        }
    }
}

/// The value unless it is missing or whitespace.
fn non_blank(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_owned)
}

/// Specification rows sharing a group heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecGroup {
    pub name: String,
    pub rows: Vec<(String, String)>,
}

/// Group specifications by heading, keeping first-seen order.
#[must_use]
pub fn group_specifications(specs: &[ProductSpecification]) -> Vec<SpecGroup> {
    let mut groups: Vec<SpecGroup> = Vec::new();
    for spec in specs {
        let row = (spec.specification_field.name.clone(), spec.value.clone());
        match groups.iter_mut().find(|g| g.name == spec.group_name()) {
            Some(group) => group.rows.push(row),
            None => groups.push(SpecGroup {
                name: spec.group_name().to_owned(),
                rows: vec![row],
            }),
        }
    }
    groups
}

fn others(products: Vec<Product>, current: &Product) -> Vec<Product> {
    products.into_iter().filter(|p| p.id != current.id).collect()
}

/// Everything the product template needs.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub product: Product,
    pub variant: Variant,
    pub all_variants: Vec<VariantSummary>,
    /// Other products from the same category, or general picks when the
    /// category has nothing else.
    pub related: Vec<Product>,
    pub location_groups: Vec<LocationGroup>,
    pub delivery: DeliveryLocation,
    pub delivery_info: DeliveryInfo,
    pub price: Option<VariantPrice>,
    pub offers: Vec<Coupon>,
    pub specifications: Vec<SpecGroup>,
    pub gallery: Gallery,
    pub meta: PageMeta,
}

/// Result of loading a product page.
#[derive(Debug)]
pub enum ProductPageOutcome {
    Found(Box<ProductPage>),
    /// Unknown slug or a product without a usable variant.
    RedirectHome,
}

/// Load a product page for `slug`, priced for `pincode`.
///
/// A missing product becomes [`ProductPageOutcome::RedirectHome`]; every
/// other fetch falls back to an empty value.
#[instrument(skip(client))]
pub async fn load(client: &StoreClient, slug: &str, pincode: &str) -> ProductPageOutcome {
    let suggestions_query = ProductQuery::new().limit(SIBLING_LIMIT);
    let (detail, suggestions, groups) = tokio::join!(
        client.product_by_slug(slug),
        client.products(&suggestions_query),
        client.location_groups(),
    );

    let detail = match detail {
        Ok(detail) => detail,
        Err(StoreApiError::NotFound(_)) => {
            tracing::info!(slug, "Unknown product slug, redirecting home");
            return ProductPageOutcome::RedirectHome;
        }
        Err(e) => {
            tracing::error!(slug, error = %e, "Product fetch failed, redirecting home");
            return ProductPageOutcome::RedirectHome;
        }
    };
    let suggestions: ProductList = or_fallback("suggested products", suggestions);
    let location_groups: Vec<LocationGroup> = or_fallback("location groups", groups);

    let ProductApiResponse {
        variant,
        product,
        all_variants,
    } = detail;
    let Some(variant) = variant else {
        tracing::warn!(slug, "Product has no variant for slug");
        return ProductPageOutcome::RedirectHome;
    };
    if all_variants.is_empty() {
        tracing::warn!(slug, "Product has no sibling variants");
        return ProductPageOutcome::RedirectHome;
    }

    let related_fut = async {
        match product.category_id() {
            Some(category) => {
                let query = ProductQuery::new()
                    .category(category.clone())
                    .limit(SIBLING_LIMIT);
                Some(or_fallback("related products", client.products(&query).await))
            }
            None => None,
        }
    };
    let (related, coupons) = tokio::join!(related_fut, client.coupons());

    let mut related = others(related.map(|l| l.products).unwrap_or_default(), &product);
    if related.is_empty() {
        related = others(suggestions.products, &product);
    }

    let now = Utc::now();
    let offers: Vec<Coupon> = or_fallback("coupons", coupons)
        .into_iter()
        .filter(|c| c.is_redeemable_at(now) && c.applies_to(&product.id))
        .collect();

    let delivery = resolve_pincode(&location_groups, pincode);
    let delivery_info = find_group(&location_groups, delivery.group_id.as_ref())
        .map(LocationGroup::delivery_info)
        .unwrap_or_default();
    let price = variant.price_for_group(delivery.group_id.as_ref()).cloned();

    let meta = PageMeta::for_variant(&variant, &product);
    let specifications = group_specifications(&variant.variant_specifications);
    let gallery = Gallery::new(variant.images.clone());

    ProductPageOutcome::Found(Box::new(ProductPage {
        product,
        variant,
        all_variants,
        related,
        location_groups,
        delivery,
        delivery_info,
        price,
        offers,
        specifications,
        gallery,
        meta,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn variant(extra: serde_json::Value) -> Variant {
        let mut base = json!({
            "id": "v1",
            "productId": "p1",
            "name": "Linen Shirt Blue M",
            "slug": "linen-shirt-blue-m",
            "images": [{"id": "m1", "url": "https://cdn.example/a.jpg"}]
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(base).unwrap()
    }

    fn product() -> Product {
        serde_json::from_value(json!({
            "id": "p1",
            "name": "Linen Shirt",
            "slug": "linen-shirt",
            "description": "A shirt"
        }))
        .unwrap()
    }

    #[test]
    fn test_meta_defaults_from_variant_name() {
        let meta = PageMeta::for_variant(&variant(json!({})), &product());
        assert_eq!(meta.title, "Buy Linen Shirt Blue M");
        assert_eq!(meta.description, "A shirt");
        let og = meta.og_image.unwrap();
        assert_eq!(og.url, "https://cdn.example/a.jpg");
        assert_eq!((og.width, og.height), (900, 1200));
    }

    #[test]
    fn test_meta_prefers_variant_fields() {
        let v = variant(json!({
            "metaTitle": "Blue linen",
            "metaDescription": "Breathable",
            "metaKeywords": ["linen"],
            "openGraphImage": "https://cdn.example/og.jpg"
        }));
        let meta = PageMeta::for_variant(&v, &product());
        assert_eq!(meta.title, "Blue linen");
        assert_eq!(meta.description, "Breathable");
        assert_eq!(meta.keywords, vec!["linen".to_owned()]);
        assert_eq!(meta.og_image.unwrap().url, "https://cdn.example/og.jpg");
    }

    #[test]
    fn test_meta_skips_blank_variant_fields() {
        let v = variant(json!({"metaTitle": " ", "metaDescription": ""}));
        let mut p = product();
        p.meta_title = Some("Linen Shirt | Favobliss".to_owned());
        let meta = PageMeta::for_variant(&v, &p);
        assert_eq!(meta.title, "Linen Shirt | Favobliss");
        assert_eq!(meta.description, "A shirt");
    }

    #[test]
    fn test_meta_placeholder_without_images() {
        let v = variant(json!({"images": []}));
        let meta = PageMeta::for_variant(&v, &product());
        assert_eq!(meta.og_image.unwrap().url, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_not_found_meta() {
        let meta = PageMeta::not_found();
        assert_eq!(meta.title, "Product Not Found");
        assert!(meta.og_image.is_none());
    }

    #[test]
    fn test_group_specifications_keeps_order() {
        let specs: Vec<ProductSpecification> = serde_json::from_value(json!([
            {"specificationField": {"name": "Fabric", "group": {"name": "Material"}}, "value": "Linen"},
            {"specificationField": {"name": "Fit"}, "value": "Regular"},
            {"specificationField": {"name": "Weave", "group": {"name": "Material"}}, "value": "Plain"}
        ]))
        .unwrap();
        let groups = group_specifications(&specs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Material");
        assert_eq!(groups[0].rows.len(), 2);
        assert_eq!(groups[1].name, "General");
    }
}
