//! Catalog shapes returned by the store API.
//!
//! These mirror the upstream JSON (camelCase keys). Fields the API sometimes
//! omits default to empty values so a partial payload still deserializes.

use serde::{Deserialize, Serialize};

use super::id::{
    BrandId, CategoryId, ColorId, LocationGroupId, LocationId, MediaId, ProductId, SizeId,
    SubCategoryId, VariantId,
};
use super::location::LocationGroup;
use super::price::{Price, discount_percent};

/// Audience a category is merchandised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "category_type", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryType {
    Men,
    Women,
    Unisex,
    Beauty,
}

/// Merchandising classification; drives the size facet on search pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryClassification {
    #[default]
    Topwear,
    Bottomwear,
    Footwear,
    #[serde(rename = "INNERWEARANDSLEEPWEAR")]
    InnerwearAndSleepwear,
    Makeup,
    Skincare,
    Haircare,
    Fragrances,
    /// A classification added upstream that this build does not know about.
    #[serde(untagged)]
    Other(String),
}

impl CategoryClassification {
    /// The upstream spelling, e.g. `INNERWEARANDSLEEPWEAR`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Topwear => "TOPWEAR",
            Self::Bottomwear => "BOTTOMWEAR",
            Self::Footwear => "FOOTWEAR",
            Self::InnerwearAndSleepwear => "INNERWEARANDSLEEPWEAR",
            Self::Makeup => "MAKEUP",
            Self::Skincare => "SKINCARE",
            Self::Haircare => "HAIRCARE",
            Self::Fragrances => "FRAGRANCES",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for CategoryClassification {
    fn from(s: String) -> Self {
        match s.as_str() {
            "TOPWEAR" => Self::Topwear,
            "BOTTOMWEAR" => Self::Bottomwear,
            "FOOTWEAR" => Self::Footwear,
            "INNERWEARANDSLEEPWEAR" => Self::InnerwearAndSleepwear,
            "MAKEUP" => Self::Makeup,
            "SKINCARE" => Self::Skincare,
            "HAIRCARE" => Self::Haircare,
            "FRAGRANCES" => Self::Fragrances,
            _ => Self::Other(s),
        }
    }
}

/// A top-level product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(rename = "type", default)]
    pub category_type: Option<CategoryType>,
    #[serde(default)]
    pub classification: Option<CategoryClassification>,
    #[serde(default)]
    pub banner_image: String,
    #[serde(default)]
    pub landing_page_banner: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sub_categories: Vec<SubCategory>,
}

/// A sub-category nested under a [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    pub id: SubCategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub parent_id: Option<SubCategoryId>,
    #[serde(default)]
    pub product_count: Option<u32>,
}

/// A brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub card_image: Option<String>,
}

/// A color option. `value` is a CSS color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub id: ColorId,
    pub name: String,
    pub value: String,
}

/// A size option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub id: SizeId,
    pub name: String,
    pub value: String,
}

/// Kind of gallery media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

/// An image or video attached to a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantImage {
    pub id: MediaId,
    pub url: String,
    #[serde(default)]
    pub media_type: MediaType,
}

impl VariantImage {
    /// Whether this media item is a video.
    #[must_use]
    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }
}

/// Price of a variant inside one delivery location group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantPrice {
    #[serde(default)]
    pub location_id: Option<LocationId>,
    pub price: Price,
    pub mrp: Price,
    pub location_group_id: LocationGroupId,
    #[serde(default)]
    pub location_group: Option<LocationGroup>,
}

impl VariantPrice {
    /// Discount of `price` against `mrp`, in whole percent.
    #[must_use]
    pub fn discount(&self) -> u8 {
        discount_percent(self.price, self.mrp)
    }
}

/// Name of a specification field, optionally grouped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationField {
    pub name: String,
    #[serde(default)]
    pub group: Option<SpecificationGroup>,
}

/// Group heading for specification fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationGroup {
    pub name: String,
}

/// A single specification row, e.g. "Fabric: Cotton".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSpecification {
    pub specification_field: SpecificationField,
    pub value: String,
}

impl ProductSpecification {
    /// Group heading, or `"General"` when the field is ungrouped.
    #[must_use]
    pub fn group_name(&self) -> &str {
        self.specification_field
            .group
            .as_ref()
            .map_or("General", |g| g.name.as_str())
    }
}

/// A sellable configuration (size/color) of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub size_id: Option<SizeId>,
    #[serde(default)]
    pub color_id: Option<ColorId>,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub images: Vec<VariantImage>,
    #[serde(default)]
    pub variant_prices: Vec<VariantPrice>,
    #[serde(default)]
    pub variant_specifications: Vec<ProductSpecification>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub meta_keywords: Vec<String>,
    #[serde(default)]
    pub open_graph_image: Option<String>,
}

impl Variant {
    /// First image-type media item.
    #[must_use]
    pub fn primary_image(&self) -> Option<&VariantImage> {
        self.images
            .iter()
            .find(|m| !m.is_video())
            .or_else(|| self.images.first())
    }

    /// Price row for `group`, falling back to the first listed price.
    #[must_use]
    pub fn price_for_group(&self, group: Option<&LocationGroupId>) -> Option<&VariantPrice> {
        group
            .and_then(|g| {
                self.variant_prices
                    .iter()
                    .find(|p| &p.location_group_id == g)
            })
            .or_else(|| self.variant_prices.first())
    }

    /// Whether any stock is left.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Short description of a sibling variant for the variant picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummary {
    pub id: VariantId,
    #[serde(default)]
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub size_id: Option<SizeId>,
    #[serde(default)]
    pub color_id: Option<ColorId>,
}

/// A product and its variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_new_arrival: bool,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub sub_category: Option<SubCategory>,
    #[serde(default)]
    pub brand: Option<Brand>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub average_rating: Option<f32>,
    #[serde(default)]
    pub warranty: Option<String>,
    #[serde(default)]
    pub size_and_fit: Vec<String>,
    #[serde(default)]
    pub material_and_care: Vec<String>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub meta_keywords: Vec<String>,
    #[serde(default)]
    pub open_graph_image: Option<String>,
}

impl Product {
    /// The product's category id, from either the flat field or the embedded category.
    #[must_use]
    pub fn category_id(&self) -> Option<&CategoryId> {
        self.category_id
            .as_ref()
            .or_else(|| self.category.as_ref().map(|c| &c.id))
    }

    /// Classification of the product's category, if known.
    #[must_use]
    pub fn classification(&self) -> Option<&CategoryClassification> {
        self.category.as_ref()?.classification.as_ref()
    }

    /// First variant, used for cards and listings.
    #[must_use]
    pub fn lead_variant(&self) -> Option<&Variant> {
        self.variants.first()
    }
}

/// Product detail payload (`GET products?slug=`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductApiResponse {
    #[serde(default)]
    pub variant: Option<Variant>,
    pub product: Product,
    #[serde(default)]
    pub all_variants: Vec<VariantSummary>,
}

/// A page of products with the total match count.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductList {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total_count: u32,
}

/// Pagination block on search responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub total_products: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

/// Response of `GET search-item`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    fn variant_json() -> serde_json::Value {
        json!({
            "id": "v1",
            "productId": "p1",
            "name": "Linen Shirt - Blue / M",
            "slug": "linen-shirt-blue-m",
            "stock": 4,
            "images": [
                {"id": "m1", "url": "https://cdn.example/v.mp4", "mediaType": "VIDEO"},
                {"id": "m2", "url": "https://cdn.example/a.jpg", "mediaType": "IMAGE"}
            ],
            "variantPrices": [
                {"locationId": "l1", "price": 999, "mrp": 1499, "locationGroupId": "g-north"},
                {"locationId": "l2", "price": 1099, "mrp": 1499, "locationGroupId": "g-south"}
            ]
        })
    }

    #[test]
    fn test_variant_deserializes_with_defaults() {
        let v: Variant = serde_json::from_value(variant_json()).unwrap();
        assert_eq!(v.stock, 4);
        assert!(v.meta_keywords.is_empty());
        assert!(v.variant_specifications.is_empty());
        assert!(v.in_stock());
    }

    #[test]
    fn test_primary_image_skips_video() {
        let v: Variant = serde_json::from_value(variant_json()).unwrap();
        assert_eq!(v.primary_image().unwrap().id.as_str(), "m2");
    }

    #[test]
    fn test_price_for_group() {
        let v: Variant = serde_json::from_value(variant_json()).unwrap();
        let south = LocationGroupId::new("g-south");
        assert_eq!(v.price_for_group(Some(&south)).unwrap().price.amount(), dec!(1099));

        let unknown = LocationGroupId::new("g-east");
        assert_eq!(v.price_for_group(Some(&unknown)).unwrap().price.amount(), dec!(999));
        assert_eq!(v.price_for_group(None).unwrap().discount(), 33);
    }

    #[test]
    fn test_unknown_classification_is_preserved() {
        let c: CategoryClassification = serde_json::from_value(json!("EYEWEAR")).unwrap();
        assert_eq!(c, CategoryClassification::Other("EYEWEAR".to_owned()));

        let c: CategoryClassification =
            serde_json::from_value(json!("INNERWEARANDSLEEPWEAR")).unwrap();
        assert_eq!(c, CategoryClassification::InnerwearAndSleepwear);
    }

    #[test]
    fn test_beauty_classifications() {
        for (wire, expected) in [
            ("MAKEUP", CategoryClassification::Makeup),
            ("SKINCARE", CategoryClassification::Skincare),
            ("HAIRCARE", CategoryClassification::Haircare),
            ("FRAGRANCES", CategoryClassification::Fragrances),
        ] {
            let c: CategoryClassification = serde_json::from_value(json!(wire)).unwrap();
            assert_eq!(c, expected);
            assert_eq!(c.as_str(), wire);
        }

        let c: CategoryClassification = serde_json::from_value(json!("ACCESSORIES")).unwrap();
        assert_eq!(c, CategoryClassification::Other("ACCESSORIES".to_owned()));
    }

    #[test]
    fn test_product_category_id_falls_back_to_embedded() {
        let p: Product = serde_json::from_value(json!({
            "id": "p1",
            "name": "Linen Shirt",
            "slug": "linen-shirt",
            "category": {"id": "c9", "name": "Men", "slug": "men", "type": "MEN"}
        }))
        .unwrap();
        assert_eq!(p.category_id().unwrap().as_str(), "c9");
        assert!(p.classification().is_none());
    }

    #[test]
    fn test_specification_group_name() {
        let spec: ProductSpecification = serde_json::from_value(json!({
            "specificationField": {"name": "Fabric"},
            "value": "Linen"
        }))
        .unwrap();
        assert_eq!(spec.group_name(), "General");
    }

    #[test]
    fn test_classification_db_spelling() {
        let known = CategoryClassification::from("INNERWEARANDSLEEPWEAR".to_owned());
        assert_eq!(known, CategoryClassification::InnerwearAndSleepwear);
        assert_eq!(known.as_str(), "INNERWEARANDSLEEPWEAR");

        let other = CategoryClassification::from("KIDSWEAR".to_owned());
        assert_eq!(other.as_str(), "KIDSWEAR");
    }
}
