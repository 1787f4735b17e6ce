//! Domain models for the storefront state layer.
//!
//! - [`session`] - the session user, creator profile and signup payload
//! - [`keys`] - storage keys for persisted state

pub mod session;

pub use session::{CreatorProfile, NewUser, SessionToken, SessionUser, keys};
