//! Core types for Creator Market.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, DiscountOutOfRange, DiscountPercent, Price};
pub use role::{UserRole, UserRoleError};
