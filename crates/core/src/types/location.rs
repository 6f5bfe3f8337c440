//! Delivery locations and serviceability.
//!
//! A [`LocationGroup`] bundles pincodes that share delivery terms (COD,
//! delivery days, express delivery) and, through variant prices, a price list.

use serde::{Deserialize, Serialize};

use super::id::{LocationGroupId, LocationId};

/// Pincode used when the shopper has not told us where to deliver.
pub const FALLBACK_PINCODE: &str = "110040";

fn default_country() -> String {
    "India".to_owned()
}

const fn default_delivery_days() -> u32 {
    1
}

/// A single serviceable pincode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub pincode: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default = "default_country")]
    pub country: String,
}

/// A set of locations sharing delivery terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationGroup {
    pub id: LocationGroupId,
    pub name: String,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub is_cod_available: bool,
    #[serde(default = "default_delivery_days")]
    pub delivery_days: u32,
    #[serde(default)]
    pub is_express_delivery: bool,
    #[serde(default)]
    pub express_delivery_text: Option<String>,
}

impl LocationGroup {
    /// The location in this group with the given pincode.
    #[must_use]
    pub fn location_for(&self, pincode: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.pincode == pincode)
    }

    /// Delivery terms for display.
    #[must_use]
    pub fn delivery_info(&self) -> DeliveryInfo {
        DeliveryInfo {
            cod_available: self.is_cod_available,
            delivery_days: self.delivery_days.max(1),
            express: self
                .is_express_delivery
                .then(|| self.express_delivery_text.clone().unwrap_or_default()),
        }
    }
}

/// Delivery terms shown next to the price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    pub cod_available: bool,
    pub delivery_days: u32,
    /// Express delivery banner text, when the group offers it.
    pub express: Option<String>,
}

impl Default for DeliveryInfo {
    fn default() -> Self {
        Self {
            cod_available: false,
            delivery_days: default_delivery_days(),
            express: None,
        }
    }
}

/// The shopper's resolved delivery location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryLocation {
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub location_id: Option<LocationId>,
    pub group_id: Option<LocationGroupId>,
    /// True when the requested pincode was not serviceable and the fallback was used.
    pub is_fallback: bool,
}

impl DeliveryLocation {
    fn from_location(group: &LocationGroup, location: &Location, is_fallback: bool) -> Self {
        Self {
            pincode: location.pincode.clone(),
            city: location.city.clone(),
            state: location.state.clone(),
            country: location.country.clone(),
            location_id: Some(location.id.clone()),
            group_id: Some(group.id.clone()),
            is_fallback,
        }
    }

    /// Delhi, used when nothing else resolves.
    #[must_use]
    pub fn default_delhi() -> Self {
        Self {
            pincode: FALLBACK_PINCODE.to_owned(),
            city: "Delhi".to_owned(),
            state: "Delhi".to_owned(),
            country: default_country(),
            location_id: None,
            group_id: None,
            is_fallback: true,
        }
    }
}

/// Resolve a pincode against the known location groups.
///
/// The first group containing the trimmed pincode wins. Otherwise the group
/// containing [`FALLBACK_PINCODE`] is used with its first location, and if
/// that group is missing too the Delhi default is returned.
#[must_use]
pub fn resolve_pincode(groups: &[LocationGroup], input: &str) -> DeliveryLocation {
    let pincode = input.trim();

    if !pincode.is_empty() {
        for group in groups {
            if let Some(location) = group.location_for(pincode) {
                return DeliveryLocation::from_location(group, location, false);
            }
        }
    }

    groups
        .iter()
        .find(|g| g.location_for(FALLBACK_PINCODE).is_some())
        .and_then(|g| g.locations.first().map(|l| (g, l)))
        .map_or_else(DeliveryLocation::default_delhi, |(g, l)| {
            DeliveryLocation::from_location(g, l, true)
        })
}

/// Find a group by id.
#[must_use]
pub fn find_group<'a>(
    groups: &'a [LocationGroup],
    id: Option<&LocationGroupId>,
) -> Option<&'a LocationGroup> {
    let id = id?;
    groups.iter().find(|g| &g.id == id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn groups() -> Vec<LocationGroup> {
        serde_json::from_value(json!([
            {
                "id": "g-south",
                "name": "South",
                "isCodAvailable": true,
                "deliveryDays": 4,
                "isExpressDelivery": false,
                "locations": [
                    {"id": "l-blr", "pincode": "560001", "city": "Bengaluru", "state": "Karnataka"}
                ]
            },
            {
                "id": "g-ncr",
                "name": "NCR",
                "isExpressDelivery": true,
                "expressDeliveryText": "Delivery by tomorrow",
                "locations": [
                    {"id": "l-gurgaon", "pincode": "122001", "city": "Gurugram", "state": "Haryana"},
                    {"id": "l-delhi", "pincode": "110040", "city": "Delhi", "state": "Delhi"}
                ]
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_resolves_exact_pincode() {
        let loc = resolve_pincode(&groups(), " 560001 ");
        assert_eq!(loc.city, "Bengaluru");
        assert_eq!(loc.group_id.unwrap().as_str(), "g-south");
        assert_eq!(loc.country, "India");
        assert!(!loc.is_fallback);
    }

    #[test]
    fn test_unknown_pincode_uses_first_location_of_fallback_group() {
        let loc = resolve_pincode(&groups(), "999999");
        assert!(loc.is_fallback);
        assert_eq!(loc.group_id.unwrap().as_str(), "g-ncr");
        // First location of the group, not the 110040 entry itself.
        assert_eq!(loc.pincode, "122001");
    }

    #[test]
    fn test_empty_input_falls_back() {
        let loc = resolve_pincode(&groups(), "   ");
        assert!(loc.is_fallback);
        assert_eq!(loc.group_id.unwrap().as_str(), "g-ncr");
    }

    #[test]
    fn test_no_groups_gives_delhi_default() {
        let loc = resolve_pincode(&[], "560001");
        assert_eq!(loc, DeliveryLocation::default_delhi());
        assert_eq!(loc.pincode, FALLBACK_PINCODE);
    }

    #[test]
    fn test_delivery_info() {
        let groups = groups();
        let south = groups[0].delivery_info();
        assert!(south.cod_available);
        assert_eq!(south.delivery_days, 4);
        assert!(south.express.is_none());

        let ncr = groups[1].delivery_info();
        assert_eq!(ncr.delivery_days, 1);
        assert_eq!(ncr.express.as_deref(), Some("Delivery by tomorrow"));
    }

    #[test]
    fn test_find_group() {
        let groups = groups();
        let id = LocationGroupId::new("g-ncr");
        assert_eq!(find_group(&groups, Some(&id)).unwrap().name, "NCR");
        assert!(find_group(&groups, None).is_none());
    }
}
