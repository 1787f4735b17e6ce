//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Mock authentication backend and signup form validation
//! - `checkout` - Checkout form validation, order pricing, simulated payment

pub mod auth;
pub mod checkout;

use std::collections::BTreeMap;

/// Per-field validation messages, keyed by form field name.
///
/// An empty map means the form is valid.
pub type FieldErrors = BTreeMap<&'static str, String>;
