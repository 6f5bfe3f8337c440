//! Favobliss Core - Shared types library.
//!
//! This crate provides the domain types used across all Favobliss components:
//! - `storefront` - Public-facing shop rendered from the remote store API
//! - `admin` - Back-office API for catalog, delivery and coupon management
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database access,
//! no HTTP clients. Behaviour that has no side effects (pincode resolution,
//! search facets, gallery video state) lives here so it can be tested in isolation.
//!
//! # Modules
//!
//! - [`types`] - Catalog, delivery, coupon and invoice shapes plus validated newtypes
//! - [`filters`] - Search facets (sizes per classification, price/rating/discount ranges)
//! - [`gallery`] - Per-media video playback state for the product gallery

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod filters;
pub mod gallery;
pub mod types;

pub use types::*;
