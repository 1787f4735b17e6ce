//! Account roles.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role '{0}' (expected 'user' or 'creator')")]
pub struct UserRoleError(pub String);

/// Role of a session user.
///
/// A `User` is a shopper; a `Creator` also runs a shop and carries a creator
/// profile. The role is fixed when the session user is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Creator,
}

impl UserRole {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Creator => "creator",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UserRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "creator" => Ok(Self::Creator),
            other => Err(UserRoleError(other.to_owned())),
        }
    }
}
