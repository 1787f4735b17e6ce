//! Session-related types.
//!
//! Types held by the session store and persisted between runs.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use creator_market_core::{Email, UserId, UserRole};

/// Public profile of a creator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorProfile {
    /// Shop handle (`/creators/{handle}`).
    pub handle: String,
    pub bio: String,
    pub followers: u32,
    pub categories: Vec<String>,
}

/// The single signed-in identity.
///
/// Stores hand out only shared references, so `role` cannot change for the
/// lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: UserRole,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Present only for creators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_profile: Option<CreatorProfile>,
}

impl SessionUser {
    /// Whether this account runs a creator shop.
    #[must_use]
    pub fn is_creator(&self) -> bool {
        self.role == UserRole::Creator
    }
}

/// Partial user data submitted by a signup form.
///
/// Every field is optional here; the auth backend decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub creator_profile: Option<CreatorProfile>,
}

/// Opaque token issued alongside a mock session.
///
/// Held as a secret in memory so it never shows up in `Debug` output or logs.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    /// Issue a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        Self(SecretString::from(format!("mock-{}", Uuid::new_v4())))
    }

    /// Expose the raw token value.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

impl Serialize for SessionToken {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

impl<'de> Deserialize<'de> for SessionToken {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|raw| Self(SecretString::from(raw)))
    }
}

/// Storage keys for persisted state.
pub mod keys {
    /// Key for the cart line items and total.
    pub const CART: &str = "cart-storage";

    /// Key for the wishlist product ids.
    pub const WISHLIST: &str = "wishlist-storage";

    /// Key for the signed-in user record.
    pub const USER: &str = "user";

    /// Key for the mock session token.
    pub const AUTH_TOKEN: &str = "auth-token";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_user_json_shape() {
        let user = SessionUser {
            id: UserId::new("user-1"),
            name: "creator".to_owned(),
            email: Email::parse("creator@test.com").unwrap(),
            role: UserRole::Creator,
            avatar: None,
            creator_profile: Some(CreatorProfile {
                handle: "creator".to_owned(),
                bio: "New creator".to_owned(),
                followers: 0,
                categories: vec!["Fashion".to_owned()],
            }),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["role"], "creator");
        assert_eq!(value["creatorProfile"]["handle"], "creator");
        assert!(value.get("avatar").is_none());

        let back: SessionUser = serde_json::from_value(value).unwrap();
        assert_eq!(back, user);
        assert!(back.is_creator());
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = SessionToken::generate();
        assert!(token.expose().starts_with("mock-"));
        assert_eq!(format!("{token:?}"), "SessionToken([REDACTED])");
    }
}
