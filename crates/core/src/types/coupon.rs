//! Discount coupons.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CouponId, ProductId, StoreId};

/// A coupon redeemable against a set of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    #[serde(default)]
    pub id: CouponId,
    #[serde(default)]
    pub store_id: StoreId,
    pub code: String,
    pub is_active: bool,
    /// Flat discount value in rupees.
    pub value: Decimal,
    pub start_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    #[serde(default)]
    pub product_ids: Vec<ProductId>,
    pub usage_per_user: i32,
    #[serde(default)]
    pub used_count: i32,
    #[serde(default)]
    pub description: Option<String>,
}

impl Coupon {
    /// Active and inside its validity window at `now` (both ends inclusive).
    #[must_use]
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.start_date <= now && now <= self.expiry_date
    }

    /// Whether the coupon applies to `product`. An empty product list applies to everything.
    #[must_use]
    pub fn applies_to(&self, product: &ProductId) -> bool {
        self.product_ids.is_empty() || self.product_ids.contains(product)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;

    fn coupon() -> Coupon {
        Coupon {
            id: CouponId::new("c1"),
            store_id: StoreId::new("s1"),
            code: "DIWALI200".to_owned(),
            is_active: true,
            value: dec!(200),
            start_date: Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
            expiry_date: Utc.with_ymd_and_hms(2026, 10, 31, 23, 59, 59).unwrap(),
            product_ids: vec![ProductId::new("p1")],
            usage_per_user: 1,
            used_count: 0,
            description: None,
        }
    }

    #[test]
    fn test_redeemable_window() {
        let c = coupon();
        assert!(c.is_redeemable_at(Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()));
        assert!(c.is_redeemable_at(c.start_date));
        assert!(!c.is_redeemable_at(Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_inactive_is_not_redeemable() {
        let c = Coupon {
            is_active: false,
            ..coupon()
        };
        assert!(!c.is_redeemable_at(Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()));
    }

    #[test]
    fn test_applies_to() {
        let c = coupon();
        assert!(c.applies_to(&ProductId::new("p1")));
        assert!(!c.applies_to(&ProductId::new("p2")));

        let all = Coupon {
            product_ids: vec![],
            ..coupon()
        };
        assert!(all.applies_to(&ProductId::new("p2")));
    }
}
