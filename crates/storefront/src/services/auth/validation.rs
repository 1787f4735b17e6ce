//! Signup form validation.

use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

use creator_market_core::UserRole;

use crate::models::{CreatorProfile, NewUser};
use crate::services::FieldErrors;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_]+$").expect("Invalid regex"));

static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s]").expect("Invalid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Creator-specific part of the signup form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatorSignup {
    pub handle: String,
    pub bio: String,
    pub category: String,
}

/// A signup form as submitted, before it reaches the auth backend.
#[derive(Debug)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    /// Present when signing up as a creator.
    pub creator: Option<CreatorSignup>,
    pub accept_terms: bool,
}

impl SignupForm {
    /// Check the form, returning one message per invalid field.
    ///
    /// Keys are `password`, `confirmPassword`, `handle`, and `terms`. An
    /// empty map means the form may be submitted.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let password = self.password.expose_secret();

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.insert(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
            );
        }

        if password != self.confirm_password.expose_secret() {
            errors.insert("confirmPassword", "Passwords do not match".to_owned());
        }

        if let Some(creator) = &self.creator {
            if creator.handle.is_empty() {
                errors.insert("handle", "Handle is required".to_owned());
            } else if !HANDLE_RE.is_match(&creator.handle) {
                errors.insert(
                    "handle",
                    "Handle can only contain lowercase letters, numbers, and underscores".to_owned(),
                );
            }
        }

        if !self.accept_terms {
            errors.insert("terms", "You must accept the terms and conditions".to_owned());
        }

        errors
    }

    /// Split the form into the data sent to the backend and the password.
    #[must_use]
    pub fn into_signup(self) -> (NewUser, SecretString) {
        let (role, creator_profile) = match self.creator {
            Some(creator) => (
                UserRole::Creator,
                Some(CreatorProfile {
                    handle: creator.handle,
                    bio: creator.bio,
                    followers: 0,
                    categories: vec![creator.category],
                }),
            ),
            None => (UserRole::User, None),
        };

        let user = NewUser {
            name: Some(self.name),
            email: Some(self.email),
            role: Some(role),
            creator_profile,
        };
        (user, self.password)
    }
}

/// Suggest a creator handle from a display name.
///
/// Lowercases, drops anything that is not a word character or whitespace,
/// then removes the whitespace.
#[must_use]
pub fn handle_from_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = NON_WORD_RE.replace_all(&lowered, "");
    WHITESPACE_RE.replace_all(&stripped, "").into_owned()
}
