//! Cache types for store API reference data.

use favobliss_core::{Brand, Category, Color, LocationGroup, Size};

/// Cache keys. Reference data only; product payloads carry stock and
/// location prices and are always fetched fresh.
pub const BRANDS: &str = "brands";
pub const CATEGORIES: &str = "categories";
pub const COLORS: &str = "colors";
pub const SIZES: &str = "sizes";
pub const LOCATION_GROUPS: &str = "location-groups";

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Brands(Vec<Brand>),
    Categories(Vec<Category>),
    Colors(Vec<Color>),
    Sizes(Vec<Size>),
    LocationGroups(Vec<LocationGroup>),
}
