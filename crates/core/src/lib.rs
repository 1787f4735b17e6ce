//! Creator Market Core - Shared types library.
//!
//! This crate provides common types used across all Creator Market components:
//! - `storefront` - Cart, wishlist and session state stores
//! - `cli` - Command-line shell that drives the stores
//!
//! # Architecture
//!
//! The core crate contains only types and the read-only sample catalog - no
//! I/O, no storage access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, emails and roles
//! - [`catalog`] - The static product, creator and category catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;

pub use catalog::{Catalog, Category, Creator, CreatorRef, Product, SocialCounts};
pub use types::*;
