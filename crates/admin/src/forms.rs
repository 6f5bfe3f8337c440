//! Request bodies for the back-office API and their validation.
//!
//! Each form deserializes the camelCase JSON the admin UI posts, then
//! [`Validate::validate`] turns it into a typed input the repositories accept.
//! Handlers report every failure as `Invalid data provided`; the per-field
//! message is only logged.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use favobliss_core::{
    CategoryClassification, CategoryType, Email, LocationId, ProductId, Slug, SlugError,
};

/// Why a form was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// The body is not JSON of the expected shape.
    #[error("malformed body: {0}")]
    Malformed(String),

    /// A field failed validation; the message is admin-facing.
    #[error("{field}: {message}")]
    Field {
        field: &'static str,
        message: String,
    },
}

impl FormError {
    fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self::Field {
            field,
            message: message.into(),
        }
    }
}

impl From<SlugError> for FormError {
    fn from(e: SlugError) -> Self {
        Self::field("slug", e.to_string())
    }
}

/// A form that can be checked into a typed input.
pub trait Validate {
    type Output;

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    fn validate(self) -> Result<Self::Output, FormError>;
}

/// Deserialize a JSON body and validate it.
///
/// # Errors
///
/// Returns [`FormError::Malformed`] for bad JSON, or the validation failure.
pub fn parse_json<F>(body: &[u8]) -> Result<F::Output, FormError>
where
    F: DeserializeOwned + Validate,
{
    let form: F = serde_json::from_slice(body).map_err(|e| FormError::Malformed(e.to_string()))?;
    form.validate()
}

/// Trimmed text, `None` when blank.
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn required_text(value: &str, field: &'static str, message: &str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::field(field, message));
    }
    Ok(trimmed.to_owned())
}

// =============================================================================
// Category
// =============================================================================

/// Category create/update body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub banner_image: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub landing_page_banner: Option<String>,
    #[serde(rename = "type", default)]
    pub category_type: Option<CategoryType>,
    #[serde(default)]
    pub classification: Option<CategoryClassification>,
}

/// A validated category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    pub slug: Slug,
    pub banner_image: String,
    pub description: Option<String>,
    pub landing_page_banner: Option<String>,
    pub category_type: Option<CategoryType>,
    pub classification: Option<CategoryClassification>,
}

impl Validate for CategoryForm {
    type Output = CategoryInput;

    fn validate(self) -> Result<CategoryInput, FormError> {
        let name = required_text(&self.name, "name", "Name is required")?;
        let slug = Slug::parse(&self.slug)?;
        let banner_image =
            required_text(&self.banner_image, "bannerImage", "Banner Image is required")?;

        Ok(CategoryInput {
            name,
            slug,
            banner_image,
            description: optional_text(self.description),
            landing_page_banner: optional_text(self.landing_page_banner),
            category_type: self.category_type,
            classification: self.classification,
        })
    }
}

// =============================================================================
// Location group
// =============================================================================

fn default_delivery_days() -> i32 {
    1
}

/// Location group create/update body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationGroupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location_ids: Vec<LocationId>,
    #[serde(default)]
    pub is_cod_available: bool,
    #[serde(default = "default_delivery_days")]
    pub delivery_days: i32,
    #[serde(default)]
    pub is_express_delivery: bool,
    #[serde(default)]
    pub express_delivery_text: Option<String>,
}

/// A validated location group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationGroupInput {
    pub name: String,
    pub location_ids: Vec<LocationId>,
    pub is_cod_available: bool,
    pub delivery_days: i32,
    pub is_express_delivery: bool,
    pub express_delivery_text: Option<String>,
}

impl Validate for LocationGroupForm {
    type Output = LocationGroupInput;

    fn validate(self) -> Result<LocationGroupInput, FormError> {
        let name = required_text(&self.name, "name", "Name is required")?;
        if self.delivery_days < 1 {
            return Err(FormError::field(
                "deliveryDays",
                "Delivery days must be at least 1",
            ));
        }

        let mut location_ids = self.location_ids;
        location_ids.sort();
        location_ids.dedup();

        Ok(LocationGroupInput {
            name,
            location_ids,
            is_cod_available: self.is_cod_available,
            delivery_days: self.delivery_days,
            is_express_delivery: self.is_express_delivery,
            express_delivery_text: optional_text(self.express_delivery_text),
        })
    }
}

// =============================================================================
// Coupon
// =============================================================================

const fn default_true() -> bool {
    true
}

const fn default_usage_per_user() -> i32 {
    1
}

/// Coupon create/update body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponForm {
    #[serde(default)]
    pub code: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub value: Decimal,
    pub start_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    #[serde(default)]
    pub product_ids: Vec<ProductId>,
    #[serde(default = "default_usage_per_user")]
    pub usage_per_user: i32,
    #[serde(default)]
    pub used_count: i32,
    #[serde(default)]
    pub description: Option<String>,
}

/// A validated coupon. `code` is upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponInput {
    pub code: String,
    pub is_active: bool,
    pub value: Decimal,
    pub start_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub product_ids: Vec<ProductId>,
    pub usage_per_user: i32,
    pub used_count: i32,
    pub description: Option<String>,
}

impl Validate for CouponForm {
    type Output = CouponInput;

    fn validate(self) -> Result<CouponInput, FormError> {
        let code = required_text(&self.code, "code", "Code is required")?.to_uppercase();
        if self.value <= Decimal::ZERO {
            return Err(FormError::field("value", "Value must be greater than 0"));
        }
        if self.expiry_date <= self.start_date {
            return Err(FormError::field(
                "expiryDate",
                "Expiry date must be after start date",
            ));
        }
        if self.usage_per_user < 1 {
            return Err(FormError::field(
                "usagePerUser",
                "Usage per user must be at least 1",
            ));
        }
        if self.used_count < 0 {
            return Err(FormError::field("usedCount", "Used count cannot be negative"));
        }

        let mut product_ids = self.product_ids;
        product_ids.sort();
        product_ids.dedup();

        Ok(CouponInput {
            code,
            is_active: self.is_active,
            value: self.value,
            start_date: self.start_date,
            expiry_date: self.expiry_date,
            product_ids,
            usage_per_user: self.usage_per_user,
            used_count: self.used_count,
            description: optional_text(self.description),
        })
    }
}

// =============================================================================
// Login
// =============================================================================

/// Login body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Validated login credentials.
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: Email,
    pub password: String,
}

impl Validate for LoginForm {
    type Output = LoginInput;

    fn validate(self) -> Result<LoginInput, FormError> {
        let email = Email::parse(&self.email).map_err(|e| FormError::field("email", e.to_string()))?;
        if self.password.is_empty() {
            return Err(FormError::field("password", "Password is required"));
        }
        Ok(LoginInput {
            email,
            password: self.password,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    fn body(value: &serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(value).unwrap()
    }

    fn field_message(err: FormError) -> String {
        match err {
            FormError::Field { message, .. } => message,
            FormError::Malformed(e) => panic!("expected a field error, got malformed: {e}"),
        }
    }

    #[test]
    fn test_category_form_valid() {
        let input = parse_json::<CategoryForm>(&body(&json!({
            "name": " Men's Topwear ",
            "slug": "mens-topwear",
            "bannerImage": "https://res.cloudinary.com/x/banner.jpg",
            "description": "  ",
            "type": "MEN",
            "classification": "TOPWEAR"
        })))
        .unwrap();

        assert_eq!(input.name, "Men's Topwear");
        assert_eq!(input.slug.as_str(), "mens-topwear");
        assert_eq!(input.description, None);
        assert_eq!(input.category_type, Some(CategoryType::Men));
        assert_eq!(input.classification, Some(CategoryClassification::Topwear));
    }

    #[test]
    fn test_category_form_messages() {
        let missing_name = CategoryForm {
            slug: "shoes".to_owned(),
            banner_image: "b.jpg".to_owned(),
            ..CategoryForm::default()
        };
        assert_eq!(
            field_message(missing_name.validate().unwrap_err()),
            "Name is required"
        );

        let bad_slug = CategoryForm {
            name: "Shoes".to_owned(),
            slug: "Running Shoes".to_owned(),
            banner_image: "b.jpg".to_owned(),
            ..CategoryForm::default()
        };
        assert_eq!(
            field_message(bad_slug.validate().unwrap_err()),
            "Slug must contain only lowercase letters, numbers, and hyphens"
        );

        let long_slug = CategoryForm {
            name: "Shoes".to_owned(),
            slug: "a".repeat(61),
            banner_image: "b.jpg".to_owned(),
            ..CategoryForm::default()
        };
        assert_eq!(
            field_message(long_slug.validate().unwrap_err()),
            "Slug must be at most 60 characters"
        );

        let no_banner = CategoryForm {
            name: "Shoes".to_owned(),
            slug: "shoes".to_owned(),
            ..CategoryForm::default()
        };
        assert_eq!(
            field_message(no_banner.validate().unwrap_err()),
            "Banner Image is required"
        );
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_json::<CategoryForm>(b"{not json").unwrap_err();
        assert!(matches!(err, FormError::Malformed(_)));
    }

    #[test]
    fn test_location_group_defaults_and_dedup() {
        let input = parse_json::<LocationGroupForm>(&body(&json!({
            "name": "Delhi NCR",
            "locationIds": ["l2", "l1", "l2"]
        })))
        .unwrap();

        assert_eq!(input.delivery_days, 1);
        assert!(!input.is_cod_available);
        assert_eq!(
            input.location_ids,
            vec![LocationId::new("l1"), LocationId::new("l2")]
        );
    }

    #[test]
    fn test_location_group_rejects_zero_days() {
        let err = parse_json::<LocationGroupForm>(&body(&json!({
            "name": "Delhi NCR",
            "deliveryDays": 0
        })))
        .unwrap_err();
        assert_eq!(field_message(err), "Delivery days must be at least 1");
    }

    fn coupon_json() -> serde_json::Value {
        json!({
            "code": " diwali200 ",
            "value": 200,
            "startDate": "2026-10-01T00:00:00Z",
            "expiryDate": "2026-10-31T23:59:59Z",
            "productIds": ["p1"]
        })
    }

    #[test]
    fn test_coupon_form_uppercases_code() {
        let input = parse_json::<CouponForm>(&body(&coupon_json())).unwrap();
        assert_eq!(input.code, "DIWALI200");
        assert_eq!(input.value, dec!(200));
        assert!(input.is_active);
        assert_eq!(input.usage_per_user, 1);
        assert_eq!(input.used_count, 0);
    }

    #[test]
    fn test_coupon_form_rules() {
        let mut zero = coupon_json();
        zero["value"] = json!(0);
        assert_eq!(
            field_message(parse_json::<CouponForm>(&body(&zero)).unwrap_err()),
            "Value must be greater than 0"
        );

        let mut backwards = coupon_json();
        backwards["expiryDate"] = json!("2026-09-30T00:00:00Z");
        assert_eq!(
            field_message(parse_json::<CouponForm>(&body(&backwards)).unwrap_err()),
            "Expiry date must be after start date"
        );

        let mut no_uses = coupon_json();
        no_uses["usagePerUser"] = json!(0);
        assert_eq!(
            field_message(parse_json::<CouponForm>(&body(&no_uses)).unwrap_err()),
            "Usage per user must be at least 1"
        );
    }

    #[test]
    fn test_login_form() {
        let input = parse_json::<LoginForm>(&body(&json!({
            "email": "Ops@Favobliss.com",
            "password": "hunter2hunter2"
        })))
        .unwrap();
        assert_eq!(input.email.as_str(), "ops@favobliss.com");

        let err = parse_json::<LoginForm>(&body(&json!({
            "email": "ops@favobliss.com",
            "password": ""
        })))
        .unwrap_err();
        assert_eq!(field_message(err), "Password is required");
    }
}
