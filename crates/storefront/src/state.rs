//! Application state shared with the presentation layer.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::{Mutex, MutexGuard};
use tracing::instrument;

use creator_market_core::{Catalog, ProductId, UserRole};

use crate::config::StorefrontConfig;
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::models::{NewUser, keys};
use crate::services::auth::{AuthError, MockAuthBackend};
use crate::services::checkout::{CheckoutError, CheckoutForm, CheckoutService, OrderConfirmation, OrderSummary};
use crate::storage::{FileStore, KeyValueStore, Repository, RepositoryError};
use crate::stores::{CartStore, SessionStore, WishlistStore};

/// Application state built once at startup.
///
/// This struct is cheaply cloneable via `Arc`. Each store sits behind its own
/// async mutex; operations that need more than one take them in the order
/// session, cart, wishlist.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    cart: Mutex<CartStore>,
    wishlist: Mutex<WishlistStore>,
    session: Mutex<SessionStore>,
    checkout: CheckoutService,
}

impl AppState {
    /// Rehydrate every store from the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if persisted state cannot be read.
    pub fn open(config: StorefrontConfig) -> Result<Self, RepositoryError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.data_dir.clone()));
        Self::with_store(config, store, Catalog::sample())
    }

    /// Rehydrate every store from an arbitrary backend and catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if persisted state cannot be read.
    pub fn with_store(
        config: StorefrontConfig,
        store: Arc<dyn KeyValueStore>,
        catalog: Catalog,
    ) -> Result<Self, RepositoryError> {
        let catalog = Arc::new(catalog);

        let cart = CartStore::load(
            Arc::clone(&catalog),
            Repository::new(Arc::clone(&store), keys::CART),
        )?;
        let wishlist = WishlistStore::load(
            Arc::clone(&catalog),
            Repository::new(Arc::clone(&store), keys::WISHLIST),
        )?;
        let session = SessionStore::load(
            MockAuthBackend::new(config.auth_latency),
            Repository::new(Arc::clone(&store), keys::USER),
            Repository::new(store, keys::AUTH_TOKEN),
        )?;
        if let Some(user) = session.user() {
            set_sentry_user(&user.id);
        }
        let checkout = CheckoutService::new(config.checkout_latency);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart: Mutex::new(cart),
                wishlist: Mutex::new(wishlist),
                session: Mutex::new(session),
                checkout,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the static catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Lock the cart.
    pub async fn cart(&self) -> MutexGuard<'_, CartStore> {
        self.inner.cart.lock().await
    }

    /// Lock the wishlist.
    pub async fn wishlist(&self) -> MutexGuard<'_, WishlistStore> {
        self.inner.wishlist.lock().await
    }

    /// Lock the session.
    pub async fn session(&self) -> MutexGuard<'_, SessionStore> {
        self.inner.session.lock().await
    }

    /// Move a wishlist entry into the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if either store cannot be persisted.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn move_to_cart(&self, product_id: &ProductId) -> Result<(), RepositoryError> {
        let mut cart = self.cart().await;
        let mut wishlist = self.wishlist().await;
        wishlist.move_to_cart(product_id, &mut cart)?;
        add_breadcrumb("wishlist", "Moved to cart", Some(&[("product_id", product_id.as_str())]));
        Ok(())
    }

    /// Sign in and tag subsequent error reports with the user.
    ///
    /// # Errors
    ///
    /// See [`SessionStore::login`].
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
        role: UserRole,
    ) -> Result<(), AuthError> {
        let mut session = self.session().await;
        session.login(email, password, role).await?;
        if let Some(user) = session.user() {
            set_sentry_user(&user.id);
        }
        Ok(())
    }

    /// Create an account and sign in as it.
    ///
    /// # Errors
    ///
    /// See [`SessionStore::signup`].
    pub async fn signup(&self, user: NewUser, password: &SecretString) -> Result<(), AuthError> {
        let mut session = self.session().await;
        session.signup(user, password).await?;
        if let Some(user) = session.user() {
            set_sentry_user(&user.id);
        }
        Ok(())
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the persisted session cannot be removed.
    pub async fn logout(&self) -> Result<(), RepositoryError> {
        let result = self.session().await.logout();
        clear_sentry_user();
        result
    }

    /// Price the current cart.
    pub async fn order_summary(&self) -> OrderSummary {
        CheckoutService::summary(&*self.cart().await)
    }

    /// Place an order for the current cart as the signed-in user.
    ///
    /// # Errors
    ///
    /// See [`CheckoutService::place_order`].
    pub async fn place_order(&self, form: &CheckoutForm) -> Result<OrderConfirmation, CheckoutError> {
        let session = self.session().await;
        let mut cart = self.cart().await;
        self.inner
            .checkout
            .place_order(session.user(), &mut cart, form)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::storage::MemoryStore;

    fn state_on(store: &MemoryStore) -> AppState {
        let config = StorefrontConfig {
            auth_latency: Duration::ZERO,
            checkout_latency: Duration::ZERO,
            ..StorefrontConfig::default()
        };
        AppState::with_store(config, Arc::new(store.clone()), Catalog::sample()).unwrap()
    }

    #[tokio::test]
    async fn test_move_to_cart_through_state() {
        let state = state_on(&MemoryStore::new());
        let id = ProductId::new("p2");

        state.wishlist().await.add_item(&id).unwrap();
        state.move_to_cart(&id).await.unwrap();

        assert_eq!(state.cart().await.quantity_of(&id), Some(1));
        assert!(state.wishlist().await.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_stores() {
        let state = state_on(&MemoryStore::new());
        let other = state.clone();

        state.cart().await.add_item(&ProductId::new("p1")).unwrap();
        assert_eq!(other.cart().await.item_count(), 1);
        assert_eq!(other.order_summary().await.subtotal.display(), "$24.99");
    }

    #[tokio::test]
    async fn test_login_survives_reopen() {
        let store = MemoryStore::new();
        let state = state_on(&store);
        state
            .login(
                "user@test.com",
                &SecretString::from("test123456".to_owned()),
                UserRole::User,
            )
            .await
            .unwrap();

        let reopened = state_on(&store);
        assert!(reopened.session().await.is_authenticated());

        reopened.logout().await.unwrap();
        assert!(!state_on(&store).session().await.is_authenticated());
    }
}
