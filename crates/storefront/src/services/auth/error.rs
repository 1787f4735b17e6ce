//! Authentication error types.

use thiserror::Error;

use crate::storage::RepositoryError;

/// Errors that can occur during login and signup.
///
/// The `Display` text of each variant is what the session store holds as its
/// user-facing error message.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password/role did not match a test account.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Signup data lacked a name, email, or role.
    #[error("Missing required fields")]
    MissingFields,

    /// Signup email could not be parsed.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] creator_market_core::EmailError),

    /// The session could not be persisted.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}
