//! Shopping cart store.
//!
//! Line items are keyed by product id and kept in insertion order. The total
//! is never edited directly: every mutation recomputes it from the catalog
//! and then persists the new state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use creator_market_core::{Catalog, CurrencyCode, Price, Product, ProductId};

use crate::storage::{Repository, RepositoryError};

/// A product id and how many of it the shopper intends to buy.
///
/// `quantity` is at least 1 for every item held by a [`CartStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Persisted cart state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub total: Price,
}

impl Default for CartState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: Price::zero(CurrencyCode::USD),
        }
    }
}

/// A cart item resolved against the catalog, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    pub product: &'a Product,
    pub quantity: u32,
    /// Discounted price of one unit.
    pub unit_price: Price,
    /// `unit_price × quantity`.
    pub line_price: Price,
}

/// Sum of discounted price × quantity over items found in the catalog.
///
/// Items whose product id is not in the catalog contribute nothing.
#[must_use]
pub fn compute_total(catalog: &Catalog, items: &[CartItem]) -> Price {
    items
        .iter()
        .filter_map(|item| {
            catalog
                .product(&item.product_id)
                .map(|product| product.discounted_price() * item.quantity)
        })
        .fold(Price::zero(CurrencyCode::USD), |acc, line| acc + line)
}

/// Cart line items plus running total, persisted on every change.
#[derive(Debug)]
pub struct CartStore {
    state: CartState,
    catalog: Arc<Catalog>,
    repo: Repository<CartState>,
}

impl CartStore {
    /// Rehydrate the cart from storage.
    ///
    /// Stored items with a zero quantity or a repeated product id are
    /// dropped, and the total is recomputed from the current catalog rather
    /// than trusted from storage.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the storage backend cannot be read.
    pub fn load(catalog: Arc<Catalog>, repo: Repository<CartState>) -> Result<Self, RepositoryError> {
        let mut state = repo.load()?.unwrap_or_default();

        let mut seen = Vec::with_capacity(state.items.len());
        state.items.retain(|item| {
            if item.quantity == 0 || seen.contains(&item.product_id) {
                return false;
            }
            seen.push(item.product_id.clone());
            true
        });
        state.total = compute_total(&catalog, &state.items);

        tracing::debug!(items = state.items.len(), total = %state.total, "Cart rehydrated");
        Ok(Self {
            state,
            catalog,
            repo,
        })
    }

    /// Current line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.state.items
    }

    /// Current total.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.state.total
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Total number of units across all items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state
            .items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Quantity held for a product, if it is in the cart.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> Option<u32> {
        self.position(product_id)
            .and_then(|idx| self.state.items.get(idx))
            .map(|item| item.quantity)
    }

    /// Items resolved against the catalog. Unknown products are skipped.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine<'_>> {
        self.state
            .items
            .iter()
            .filter_map(|item| {
                let product = self.catalog.product(&item.product_id)?;
                let unit_price = product.discounted_price();
                Some(CartLine {
                    product,
                    quantity: item.quantity,
                    unit_price,
                    line_price: unit_price * item.quantity,
                })
            })
            .collect()
    }

    /// Add one unit of a product.
    ///
    /// Increments the quantity if the product is already in the cart,
    /// otherwise appends it with quantity 1. Unknown ids are accepted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the new state cannot be persisted. The
    /// in-memory cart keeps the change either way.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn add_item(&mut self, product_id: &ProductId) -> Result<(), RepositoryError> {
        match self.position(product_id).and_then(|idx| self.state.items.get_mut(idx)) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.state.items.push(CartItem {
                product_id: product_id.clone(),
                quantity: 1,
            }),
        }
        self.commit()
    }

    /// Remove a product entirely. No-op if it is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the new state cannot be persisted.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<(), RepositoryError> {
        self.state.items.retain(|item| &item.product_id != product_id);
        self.commit()
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// A quantity below 1 removes the item. Quantities beyond `u32::MAX` are
    /// clamped. Products not in the cart are left absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the new state cannot be persisted.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), RepositoryError> {
        if quantity < 1 {
            return self.remove_item(product_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self
            .position(product_id)
            .and_then(|idx| self.state.items.get_mut(idx))
        {
            item.quantity = quantity;
        }
        self.commit()
    }

    /// Empty the cart and reset the total to zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the new state cannot be persisted.
    #[instrument(skip_all)]
    pub fn clear(&mut self) -> Result<(), RepositoryError> {
        self.state.items.clear();
        self.commit()
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.state
            .items
            .iter()
            .position(|item| &item.product_id == product_id)
    }

    fn commit(&mut self) -> Result<(), RepositoryError> {
        self.state.total = compute_total(&self.catalog, &self.state.items);
        tracing::debug!(
            items = self.state.items.len(),
            total = %self.state.total,
            "Cart updated"
        );
        self.repo.save(&self.state).inspect_err(|e| {
            tracing::error!(error = %e, "Failed to persist cart");
        })
    }
}
