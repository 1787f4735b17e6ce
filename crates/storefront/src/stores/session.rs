//! Auth session store.
//!
//! Tracks at most one signed-in user plus the loading flag and error message
//! a login form renders. Login and signup suspend on the [`AuthBackend`];
//! dropping one of those futures part way leaves the store as it was, with
//! the loading flag cleared.

use secrecy::SecretString;
use tracing::instrument;

use creator_market_core::UserRole;

use crate::models::{NewUser, SessionToken, SessionUser};
use crate::services::auth::{AuthBackend, AuthError, MockAuthBackend};
use crate::storage::{Repository, RepositoryError};

/// Observable session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// `None` while anonymous.
    pub user: Option<SessionUser>,
    /// An auth call is in flight.
    pub is_loading: bool,
    /// Message from the last failed auth call, until cleared.
    pub error: Option<String>,
}

/// Marks an auth call in flight for as long as it is alive.
struct InFlight<'a> {
    state: &'a mut AuthState,
}

impl<'a> InFlight<'a> {
    fn begin(state: &'a mut AuthState) -> Self {
        state.is_loading = true;
        state.error = None;
        Self { state }
    }

    fn settle(self, outcome: Result<SessionUser, AuthError>) -> Result<(), AuthError> {
        match outcome {
            Ok(user) => {
                self.state.user = Some(user);
                Ok(())
            }
            Err(e) => {
                self.state.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.is_loading = false;
    }
}

/// The single session, persisted under the user and token keys.
#[derive(Debug)]
pub struct SessionStore<B = MockAuthBackend> {
    state: AuthState,
    backend: B,
    users: Repository<SessionUser>,
    tokens: Repository<SessionToken>,
}

impl<B: AuthBackend> SessionStore<B> {
    /// Rehydrate the session. A persisted user starts the store signed in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the storage backend cannot be read.
    pub fn load(
        backend: B,
        users: Repository<SessionUser>,
        tokens: Repository<SessionToken>,
    ) -> Result<Self, RepositoryError> {
        let user = users.load()?;
        if let Some(user) = &user {
            tracing::debug!(user_id = %user.id, role = %user.role, "Session rehydrated");
        }

        Ok(Self {
            state: AuthState {
                user,
                ..AuthState::default()
            },
            backend,
            users,
            tokens,
        })
    }

    /// Full observable state.
    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    /// Signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&SessionUser> {
        self.state.user.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.state.user.is_some()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    /// Message from the last failed login or signup.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    /// Token issued with the current session, read from storage.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the storage backend cannot be read.
    pub fn token(&self) -> Result<Option<SessionToken>, RepositoryError> {
        self.tokens.load()
    }

    /// Sign in with one of the test accounts.
    ///
    /// On failure the error is also held in [`Self::error`] and the current
    /// user is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on a mismatch, or
    /// `AuthError::Repository` if the session cannot be persisted.
    #[instrument(skip(self, email, password))]
    pub async fn login(
        &mut self,
        email: &str,
        password: &SecretString,
        role: UserRole,
    ) -> Result<(), AuthError> {
        let flight = InFlight::begin(&mut self.state);
        let outcome = match self.backend.login(email, password, role).await {
            Ok(user) => persist(&self.users, &self.tokens, flight.state.user.as_ref(), user),
            Err(e) => Err(e),
        };
        flight.settle(outcome)
    }

    /// Create an account and sign in as it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` or `AuthError::InvalidEmail` for
    /// unusable signup data, or `AuthError::Repository` if the session cannot
    /// be persisted.
    #[instrument(skip_all)]
    pub async fn signup(&mut self, user: NewUser, password: &SecretString) -> Result<(), AuthError> {
        let flight = InFlight::begin(&mut self.state);
        let outcome = match self.backend.signup(user, password).await {
            Ok(user) => persist(&self.users, &self.tokens, flight.state.user.as_ref(), user),
            Err(e) => Err(e),
        };
        flight.settle(outcome)
    }

    /// Sign out and forget the persisted session.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the persisted session cannot be removed.
    /// The store is anonymous either way.
    #[instrument(skip_all)]
    pub fn logout(&mut self) -> Result<(), RepositoryError> {
        if let Some(user) = self.state.user.take() {
            tracing::info!(user_id = %user.id, "Signed out");
        }
        self.state.error = None;
        self.state.is_loading = false;

        let users = self.users.clear();
        let tokens = self.tokens.clear();
        users.and(tokens)
    }

    /// Dismiss the held error message.
    pub fn clear_error(&mut self) {
        self.state.error = None;
    }
}

/// Save `user` and a fresh token. If the token cannot be saved the user key
/// is put back to `previous`, so a restart never resumes a failed sign-in.
fn persist(
    users: &Repository<SessionUser>,
    tokens: &Repository<SessionToken>,
    previous: Option<&SessionUser>,
    user: SessionUser,
) -> Result<SessionUser, AuthError> {
    users.save(&user)?;
    if let Err(e) = tokens.save(&SessionToken::generate()) {
        let restored = previous.map_or_else(|| users.clear(), |prev| users.save(prev));
        if let Err(rollback) = restored {
            tracing::error!(error = %rollback, "Failed to roll back session user");
        }
        return Err(e.into());
    }
    Ok(user)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::models::keys;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn secret(raw: &str) -> SecretString {
        SecretString::from(raw.to_owned())
    }

    /// Backend whose writes and removals fail for one key.
    #[derive(Debug)]
    struct BrokenKey {
        inner: MemoryStore,
        key: &'static str,
    }

    impl BrokenKey {
        fn check(&self, key: &str) -> Result<(), RepositoryError> {
            if key == self.key {
                return Err(std::io::Error::other("disk full").into());
            }
            Ok(())
        }
    }

    impl KeyValueStore for BrokenKey {
        fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
            self.check(key)?;
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), RepositoryError> {
            self.check(key)?;
            self.inner.remove(key)
        }
    }

    fn session_on(store: &MemoryStore, latency: Duration) -> SessionStore {
        session_with(Arc::new(store.clone()), latency)
    }

    fn session_with(backend: Arc<dyn KeyValueStore>, latency: Duration) -> SessionStore {
        SessionStore::load(
            MockAuthBackend::new(latency),
            Repository::new(Arc::clone(&backend), keys::USER),
            Repository::new(backend, keys::AUTH_TOKEN),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_login_success_persists_user_and_token() {
        let store = MemoryStore::new();
        let mut session = session_on(&store, Duration::ZERO);

        session
            .login("user@test.com", &secret("test123456"), UserRole::User)
            .await
            .unwrap();

        let user = session.user().unwrap();
        assert_eq!(user.role, UserRole::User);
        assert!(!session.is_loading());
        assert!(session.error().is_none());
        assert!(store.get(keys::USER).unwrap().is_some());
        assert!(session.token().unwrap().unwrap().expose().starts_with("mock-"));
    }

    #[tokio::test]
    async fn test_wrong_password_holds_error() {
        let store = MemoryStore::new();
        let mut session = session_on(&store, Duration::ZERO);

        let err = session
            .login("user@test.com", &secret("nope"), UserRole::User)
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(session.error(), Some("Invalid credentials"));
        assert!(!session.is_authenticated());
        assert!(!session.is_loading());
        assert!(store.is_empty());

        session.clear_error();
        assert!(session.error().is_none());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_existing_user() {
        let store = MemoryStore::new();
        let mut session = session_on(&store, Duration::ZERO);
        session
            .login("creator@test.com", &secret("test123456"), UserRole::Creator)
            .await
            .unwrap();
        let before = session.user().cloned();

        let _ = session
            .login("user@test.com", &secret("bad"), UserRole::User)
            .await;

        assert_eq!(session.user().cloned(), before);
        assert_eq!(session.error(), Some("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_signup_missing_name_stays_anonymous() {
        let store = MemoryStore::new();
        let mut session = session_on(&store, Duration::ZERO);

        let data = NewUser {
            name: Some(String::new()),
            email: Some("a@b.com".to_owned()),
            role: Some(UserRole::User),
            creator_profile: None,
        };
        let err = session.signup(data, &secret("pw")).await.unwrap_err();

        assert_eq!(err.to_string(), "Missing required fields");
        assert_eq!(session.error(), Some("Missing required fields"));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_signup_then_error_is_cleared_by_next_attempt() {
        let store = MemoryStore::new();
        let mut session = session_on(&store, Duration::ZERO);
        let _ = session.signup(NewUser::default(), &secret("pw")).await;
        assert!(session.error().is_some());

        let data = NewUser {
            name: Some("Ada".to_owned()),
            email: Some("ada@example.com".to_owned()),
            role: Some(UserRole::User),
            creator_profile: None,
        };
        session.signup(data, &secret("password1")).await.unwrap();

        assert!(session.error().is_none());
        assert_eq!(session.user().unwrap().name, "Ada");
    }

    #[tokio::test]
    async fn test_rehydrate_and_logout() {
        let store = MemoryStore::new();
        {
            let mut session = session_on(&store, Duration::ZERO);
            session
                .login("creator@test.com", &secret("test123456"), UserRole::Creator)
                .await
                .unwrap();
        }

        let mut session = session_on(&store, Duration::ZERO);
        assert!(session.user().unwrap().is_creator());

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(store.is_empty());

        let fresh = session_on(&store, Duration::ZERO);
        assert!(!fresh.is_authenticated());
        assert!(fresh.token().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_login_resets_loading() {
        let store = MemoryStore::new();
        let mut session = session_on(&store, Duration::from_secs(60));

        let attempt = tokio::time::timeout(
            Duration::from_millis(10),
            session.login("user@test.com", &secret("test123456"), UserRole::User),
        )
        .await;

        assert!(attempt.is_err());
        assert!(!session.is_loading());
        assert!(!session.is_authenticated());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_token_write_failure_leaves_no_user_on_disk() {
        let store = MemoryStore::new();
        let broken = Arc::new(BrokenKey {
            inner: store.clone(),
            key: keys::AUTH_TOKEN,
        });
        let mut session = session_with(broken, Duration::ZERO);

        let err = session
            .login("user@test.com", &secret("test123456"), UserRole::User)
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Repository(_)));
        assert!(!session.is_authenticated());
        assert!(store.get(keys::USER).unwrap().is_none());

        let restarted = session_on(&store, Duration::ZERO);
        assert!(!restarted.is_authenticated());
    }

    #[tokio::test]
    async fn test_token_write_failure_restores_previous_user() {
        let store = MemoryStore::new();
        session_on(&store, Duration::ZERO)
            .login("creator@test.com", &secret("test123456"), UserRole::Creator)
            .await
            .unwrap();

        let broken = Arc::new(BrokenKey {
            inner: store.clone(),
            key: keys::AUTH_TOKEN,
        });
        let mut session = session_with(broken, Duration::ZERO);
        let _ = session
            .login("user@test.com", &secret("test123456"), UserRole::User)
            .await;
        assert!(session.user().unwrap().is_creator());

        let restarted = session_on(&store, Duration::ZERO);
        assert!(restarted.user().unwrap().is_creator());
    }

    #[tokio::test]
    async fn test_logout_clears_token_when_user_removal_fails() {
        let store = MemoryStore::new();
        session_on(&store, Duration::ZERO)
            .login("user@test.com", &secret("test123456"), UserRole::User)
            .await
            .unwrap();

        let broken = Arc::new(BrokenKey {
            inner: store.clone(),
            key: keys::USER,
        });
        let mut session = session_with(broken, Duration::ZERO);

        assert!(session.logout().is_err());
        assert!(!session.is_authenticated());
        assert!(store.get(keys::AUTH_TOKEN).unwrap().is_none());
    }
}
