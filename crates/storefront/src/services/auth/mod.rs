//! Authentication service.
//!
//! There is no identity provider behind the storefront. [`AuthBackend`] is the
//! async seam a real client would plug into; [`MockAuthBackend`] waits for a
//! configurable latency and then either matches the fixed test accounts
//! (login) or fabricates a user record from the submitted data (signup).

mod error;
mod validation;

pub use error::AuthError;
pub use validation::{CreatorSignup, SignupForm, handle_from_name};

use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use url::Url;

use creator_market_core::{Email, UserId, UserRole};

use crate::models::{CreatorProfile, NewUser, SessionUser};

/// Default latency of the mock backend.
pub const DEFAULT_AUTH_LATENCY: Duration = Duration::from_millis(1000);

/// Category assigned to creator profiles fabricated without one.
pub const DEFAULT_CREATOR_CATEGORY: &str = "Fashion";

/// Upper bound (exclusive) of the follower count given to a creator on login.
const MAX_MOCK_FOLLOWERS: u32 = 1000;

static AVATAR_BASE: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://api.dicebear.com/7.x/avataaars/svg").expect("Invalid avatar URL")
});

/// A fixed account accepted by [`MockAuthBackend::login`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCredential {
    pub email: &'static str,
    pub password: &'static str,
    pub role: UserRole,
}

/// The accounts login accepts, one per role.
pub const TEST_CREDENTIALS: [TestCredential; 2] = [
    TestCredential {
        email: "user@test.com",
        password: "test123456",
        role: UserRole::User,
    },
    TestCredential {
        email: "creator@test.com",
        password: "test123456",
        role: UserRole::Creator,
    },
];

/// Async authentication boundary used by the session store.
pub trait AuthBackend: Send + Sync {
    /// Authenticate an existing account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email, password, and
    /// role do not identify an account.
    fn login(
        &self,
        email: &str,
        password: &SecretString,
        role: UserRole,
    ) -> impl Future<Output = Result<SessionUser, AuthError>> + Send;

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if name, email, or role is absent
    /// or empty, and `AuthError::InvalidEmail` if the email cannot be parsed.
    fn signup(
        &self,
        user: NewUser,
        password: &SecretString,
    ) -> impl Future<Output = Result<SessionUser, AuthError>> + Send;
}

/// Backend that simulates a network round trip and never leaves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockAuthBackend {
    latency: Duration,
}

impl MockAuthBackend {
    /// Create a backend that sleeps for `latency` before answering.
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Simulated round-trip time.
    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for MockAuthBackend {
    fn default() -> Self {
        Self::new(DEFAULT_AUTH_LATENCY)
    }
}

impl AuthBackend for MockAuthBackend {
    #[instrument(skip(self, email, password))]
    async fn login(
        &self,
        email: &str,
        password: &SecretString,
        role: UserRole,
    ) -> Result<SessionUser, AuthError> {
        tokio::time::sleep(self.latency).await;
        authenticate(email, password.expose_secret(), role)
    }

    #[instrument(skip_all)]
    async fn signup(
        &self,
        user: NewUser,
        _password: &SecretString,
    ) -> Result<SessionUser, AuthError> {
        tokio::time::sleep(self.latency).await;
        register(user)
    }
}

/// Match a login attempt against [`TEST_CREDENTIALS`] and build the user.
fn authenticate(email: &str, password: &str, role: UserRole) -> Result<SessionUser, AuthError> {
    let matched = TEST_CREDENTIALS
        .iter()
        .any(|c| c.role == role && c.email == email && c.password == password);
    if !matched {
        tracing::info!(%role, "Login rejected");
        return Err(AuthError::InvalidCredentials);
    }

    let email = Email::parse(email)?;
    let creator_profile = (role == UserRole::Creator).then(|| CreatorProfile {
        handle: email.local_part().to_lowercase(),
        bio: "Creator bio goes here".to_owned(),
        followers: rand::rng().random_range(0..MAX_MOCK_FOLLOWERS),
        categories: vec![DEFAULT_CREATOR_CATEGORY.to_owned()],
    });

    let user = SessionUser {
        id: fresh_user_id(),
        name: email.local_part().to_owned(),
        avatar: Some(avatar_url(&email)),
        email,
        role,
        creator_profile,
    };
    tracing::info!(user_id = %user.id, %role, "Login accepted");
    Ok(user)
}

/// Fabricate a user record from signup data.
fn register(user: NewUser) -> Result<SessionUser, AuthError> {
    let present = |field: Option<String>| field.filter(|s| !s.trim().is_empty());
    let (Some(name), Some(email), Some(role)) =
        (present(user.name), present(user.email), user.role)
    else {
        return Err(AuthError::MissingFields);
    };

    let email = Email::parse(&email)?;
    let creator_profile = (role == UserRole::Creator).then(|| {
        user.creator_profile.unwrap_or_else(|| CreatorProfile {
            handle: email.local_part().to_lowercase(),
            bio: "New creator".to_owned(),
            followers: 0,
            categories: vec![DEFAULT_CREATOR_CATEGORY.to_owned()],
        })
    });

    let user = SessionUser {
        id: fresh_user_id(),
        name,
        avatar: Some(avatar_url(&email)),
        email,
        role,
        creator_profile,
    };
    tracing::info!(user_id = %user.id, %role, "Account created");
    Ok(user)
}

fn fresh_user_id() -> UserId {
    UserId::new(format!("user-{}", Utc::now().timestamp_millis()))
}

fn avatar_url(email: &Email) -> String {
    let mut url = AVATAR_BASE.clone();
    url.set_query(Some(&format!("seed={email}")));
    url.into()
}
