//! Rupee prices using decimal arithmetic.
//!
//! All catalog prices are in INR. The store API sends them as JSON numbers;
//! [`Price`] keeps them as [`Decimal`] so discounts and totals never pick up
//! float rounding.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

/// A price in Indian rupees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from an INR amount.
    #[must_use]
    pub const fn inr(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The amount in rupees.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the price is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiply by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl core::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, p| acc + p)
    }
}

/// Formats as `₹1,29,999` (Indian digit grouping), with paise only when non-zero.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let abs = rounded.abs();
        let rupees = abs.trunc();
        let paise = ((abs - rupees) * Decimal::ONE_HUNDRED).to_u32().unwrap_or(0);

        write!(f, "{sign}₹{}", group_indian(&rupees.to_string()))?;
        if paise > 0 {
            write!(f, ".{paise:02}")?;
        }
        Ok(())
    }
}

/// Group an integer string as lakh/crore: last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        if let Some(group) = head.get(start..end) {
            groups.push(group);
        }
        end = start;
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

/// Whole-number discount of `price` against `mrp`, rounded half up.
///
/// Returns 0 when there is no discount or the MRP is missing.
#[must_use]
pub fn discount_percent(price: Price, mrp: Price) -> u8 {
    if mrp.0 <= Decimal::ZERO || mrp.0 <= price.0 {
        return 0;
    }
    let pct = ((mrp.0 - price.0) / mrp.0 * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    pct.to_u8().unwrap_or(100).min(100)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_display_small_amount() {
        assert_eq!(Price::inr(dec!(499)).to_string(), "₹499");
        assert_eq!(Price::ZERO.to_string(), "₹0");
    }

    #[test]
    fn test_display_indian_grouping() {
        assert_eq!(Price::inr(dec!(1299)).to_string(), "₹1,299");
        assert_eq!(Price::inr(dec!(129999)).to_string(), "₹1,29,999");
        assert_eq!(Price::inr(dec!(12345678)).to_string(), "₹1,23,45,678");
    }

    #[test]
    fn test_display_paise() {
        assert_eq!(Price::inr(dec!(1299.5)).to_string(), "₹1,299.50");
        assert_eq!(Price::inr(dec!(1299.00)).to_string(), "₹1,299");
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(discount_percent(Price::inr(dec!(750)), Price::inr(dec!(1000))), 25);
        assert_eq!(discount_percent(Price::inr(dec!(666)), Price::inr(dec!(1000))), 33);
        assert_eq!(discount_percent(Price::inr(dec!(665)), Price::inr(dec!(1000))), 34);
    }

    #[test]
    fn test_discount_without_markdown() {
        assert_eq!(discount_percent(Price::inr(dec!(1000)), Price::inr(dec!(1000))), 0);
        assert_eq!(discount_percent(Price::inr(dec!(1200)), Price::inr(dec!(1000))), 0);
        assert_eq!(discount_percent(Price::inr(dec!(10)), Price::ZERO), 0);
    }

    #[test]
    fn test_deserializes_from_json_number() {
        let price: Price = serde_json::from_str("1299.5").unwrap();
        assert_eq!(price.amount(), dec!(1299.5));
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::inr(dec!(100)), Price::inr(dec!(250.25))]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), dec!(350.25));
    }
}
