//! Client-side state stores.
//!
//! # Stores
//!
//! - [`CartStore`] - line items and running total
//! - [`WishlistStore`] - saved-for-later product ids
//! - [`SessionStore`] - the signed-in user
//!
//! Each store is rehydrated from its [`Repository`](crate::storage::Repository)
//! when constructed and writes back after every mutation.

pub mod cart;
pub mod session;
pub mod wishlist;

pub use cart::{CartItem, CartLine, CartState, CartStore, compute_total};
pub use session::{AuthState, SessionStore};
pub use wishlist::{WishlistState, WishlistStore};
