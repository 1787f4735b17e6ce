//! Creator Market storefront state layer.
//!
//! Cart, wishlist and session stores backed by local key/value storage, the
//! mock auth backend, checkout, and the [`AppState`] context that ties them
//! together for a presentation layer.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod stores;

pub use config::{ConfigError, StorefrontConfig};
pub use error::AppError;
pub use state::AppState;
