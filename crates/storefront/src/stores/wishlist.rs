//! Wishlist store: a saved-for-later set of product ids.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use creator_market_core::{Catalog, Product, ProductId};

use super::CartStore;
use crate::storage::{Repository, RepositoryError};

/// Persisted wishlist state. Ids are unique and kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistState {
    pub items: Vec<ProductId>,
}

/// Set of wished-for product ids, persisted on every change.
#[derive(Debug)]
pub struct WishlistStore {
    state: WishlistState,
    catalog: Arc<Catalog>,
    repo: Repository<WishlistState>,
}

impl WishlistStore {
    /// Rehydrate the wishlist from storage, dropping repeated ids.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the storage backend cannot be read.
    pub fn load(
        catalog: Arc<Catalog>,
        repo: Repository<WishlistState>,
    ) -> Result<Self, RepositoryError> {
        let stored = repo.load()?.unwrap_or_default();

        let mut items: Vec<ProductId> = Vec::with_capacity(stored.items.len());
        for id in stored.items {
            if !items.contains(&id) {
                items.push(id);
            }
        }

        Ok(Self {
            state: WishlistState { items },
            catalog,
            repo,
        })
    }

    /// Wished-for ids in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[ProductId] {
        &self.state.items
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    /// Whether the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Whether a product is in the wishlist.
    #[must_use]
    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.state.items.contains(product_id)
    }

    /// Entries resolved against the catalog. Unknown products are skipped.
    #[must_use]
    pub fn products(&self) -> Vec<&Product> {
        self.state
            .items
            .iter()
            .filter_map(|id| self.catalog.product(id))
            .collect()
    }

    /// Add a product unless it is already present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the new state cannot be persisted.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn add_item(&mut self, product_id: &ProductId) -> Result<(), RepositoryError> {
        if self.is_in_wishlist(product_id) {
            return Ok(());
        }
        self.state.items.push(product_id.clone());
        self.commit()
    }

    /// Remove a product if present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the new state cannot be persisted.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<(), RepositoryError> {
        self.state.items.retain(|id| id != product_id);
        self.commit()
    }

    /// Add one unit of the product to `cart`, then drop it from the wishlist.
    ///
    /// The two steps are not atomic: if the cart cannot be persisted the
    /// error is returned and the wishlist is left untouched, but the cart
    /// keeps its in-memory increment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if either store cannot be persisted.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn move_to_cart(
        &mut self,
        product_id: &ProductId,
        cart: &mut CartStore,
    ) -> Result<(), RepositoryError> {
        cart.add_item(product_id)?;
        self.remove_item(product_id)
    }

    /// Remove every entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the new state cannot be persisted.
    #[instrument(skip_all)]
    pub fn clear(&mut self) -> Result<(), RepositoryError> {
        self.state.items.clear();
        self.commit()
    }

    fn commit(&self) -> Result<(), RepositoryError> {
        tracing::debug!(items = self.state.items.len(), "Wishlist updated");
        self.repo.save(&self.state).inspect_err(|e| {
            tracing::error!(error = %e, "Failed to persist wishlist");
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::keys;
    use crate::storage::MemoryStore;

    fn id(raw: &str) -> ProductId {
        ProductId::new(raw)
    }

    fn stores_on(store: &MemoryStore) -> (WishlistStore, CartStore) {
        let catalog = Arc::new(Catalog::sample());
        let backend: Arc<MemoryStore> = Arc::new(store.clone());
        let wishlist =
            WishlistStore::load(Arc::clone(&catalog), Repository::new(backend.clone(), keys::WISHLIST))
                .unwrap();
        let cart = CartStore::load(catalog, Repository::new(backend, keys::CART)).unwrap();
        (wishlist, cart)
    }

    #[test]
    fn test_add_twice_keeps_one_entry() {
        let (mut wishlist, _) = stores_on(&MemoryStore::new());
        wishlist.add_item(&id("p2")).unwrap();
        wishlist.add_item(&id("p2")).unwrap();

        assert_eq!(wishlist.items(), &[id("p2")]);
        assert!(wishlist.is_in_wishlist(&id("p2")));
        assert!(!wishlist.is_in_wishlist(&id("p1")));
    }

    #[test]
    fn test_remove_and_clear() {
        let (mut wishlist, _) = stores_on(&MemoryStore::new());
        wishlist.add_item(&id("p1")).unwrap();
        wishlist.add_item(&id("p3")).unwrap();

        wishlist.remove_item(&id("p1")).unwrap();
        wishlist.remove_item(&id("missing")).unwrap();
        assert_eq!(wishlist.items(), &[id("p3")]);

        wishlist.clear().unwrap();
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_move_to_cart_increments_by_one() {
        for prior in [0_i64, 1, 4] {
            let (mut wishlist, mut cart) = stores_on(&MemoryStore::new());
            if prior > 0 {
                cart.add_item(&id("p1")).unwrap();
                cart.update_quantity(&id("p1"), prior).unwrap();
            }
            wishlist.add_item(&id("p1")).unwrap();

            wishlist.move_to_cart(&id("p1"), &mut cart).unwrap();

            let expected = u32::try_from(prior + 1).unwrap();
            assert_eq!(cart.quantity_of(&id("p1")), Some(expected));
            assert!(!wishlist.is_in_wishlist(&id("p1")));
        }
    }

    #[test]
    fn test_products_skip_unknown_ids() {
        let (mut wishlist, _) = stores_on(&MemoryStore::new());
        wishlist.add_item(&id("retired")).unwrap();
        wishlist.add_item(&id("p3")).unwrap();

        let products = wishlist.products();
        assert_eq!(products.len(), 1);
        assert_eq!(wishlist.len(), 2);
    }

    #[test]
    fn test_state_survives_reload() {
        let store = MemoryStore::new();
        {
            let (mut wishlist, _) = stores_on(&store);
            wishlist.add_item(&id("p3")).unwrap();
            wishlist.add_item(&id("p1")).unwrap();
        }

        let (wishlist, _) = stores_on(&store);
        assert_eq!(wishlist.items(), &[id("p3"), id("p1")]);
    }
}
