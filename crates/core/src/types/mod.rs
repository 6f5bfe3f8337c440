//! Core types for Favobliss.
//!
//! Wire shapes mirror the remote store API (camelCase JSON). Validated
//! newtypes reject bad input at the boundary.

pub mod catalog;
pub mod coupon;
pub mod email;
pub mod id;
pub mod invoice;
pub mod location;
pub mod price;
pub mod slug;

pub use catalog::*;
pub use coupon::Coupon;
pub use email::{Email, EmailError};
pub use id::*;
pub use invoice::{DeliveredTo, InvoiceData, InvoiceItem, SoldBy};
pub use location::{
    DeliveryInfo, DeliveryLocation, FALLBACK_PINCODE, Location, LocationGroup, find_group,
    resolve_pincode,
};
pub use price::{Price, discount_percent};
pub use slug::{Slug, SlugError};
