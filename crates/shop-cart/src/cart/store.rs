//! Persisted cart store.

use std::fmt;
use std::sync::Arc;

use shop_storage::{keys, Store};

use crate::cart::{service_key, AddOutcome, Cart, CartView, LineItem};
use crate::catalog::PriceCatalog;
use crate::error::CartError;
use crate::money::Money;
use crate::notify::{Notice, Notifier};

/// A removal awaiting user confirmation.
///
/// Obtained from [`CartStore::request_removal`] and consumed by
/// [`CartStore::confirm_removal`] or [`CartStore::cancel_removal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRemoval {
    index: usize,
    service: String,
}

impl PendingRemoval {
    /// Index of the line item to remove.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Service key of the line item to remove.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Confirmation question to show the user.
    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to remove \"{}\" from the cart?",
            self.service
        )
    }
}

/// The cart together with its storage and notification collaborators.
///
/// Every mutation is persisted under the `cart` key. Storage is
/// best-effort: write failures during a mutation are logged and the
/// in-memory cart stays authoritative.
pub struct CartStore {
    cart: Cart,
    storage: Store,
    notifier: Arc<dyn Notifier>,
}

impl CartStore {
    /// Create a store with an empty cart. Nothing is read from storage.
    pub fn new(storage: Store, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            cart: Cart::new(),
            storage,
            notifier,
        }
    }

    /// Create a store and rehydrate the cart from storage.
    pub fn open(storage: Store, notifier: Arc<dyn Notifier>) -> Self {
        let mut store = Self::new(storage, notifier);
        store.restore();
        store
    }

    /// Add one unit of `service` (with optional `spec`) at `unit_price`.
    ///
    /// If the line item already exists its quantity grows by one and
    /// `unit_price` is ignored.
    pub fn add(
        &mut self,
        service: &str,
        spec: &str,
        unit_price: Money,
    ) -> Result<&LineItem, CartError> {
        let key = service_key(service, spec);
        let outcome = self.cart.add(key.clone(), unit_price)?;

        match outcome {
            AddOutcome::Inserted { .. } => {
                tracing::debug!(service = %key, price = unit_price.amount(), "line item added");
            }
            AddOutcome::Merged { quantity, .. } => {
                tracing::debug!(service = %key, quantity, "line item quantity increased");
            }
        }

        self.notifier.notify(&Notice::success(format!(
            "Service \"{}\" added to the cart.",
            key
        )));
        self.save();

        Ok(&self.cart.items()[outcome.index()])
    }

    /// Add one unit, pricing it from `catalog`.
    ///
    /// A selection the catalog cannot price raises a blocking alert and
    /// leaves the cart unchanged.
    pub fn add_from_catalog<C>(
        &mut self,
        catalog: &C,
        service: &str,
        spec: &str,
    ) -> Result<&LineItem, CartError>
    where
        C: PriceCatalog + ?Sized,
    {
        match catalog.unit_price(service, spec) {
            Some(price) => self.add(service, spec, price),
            None => {
                let key = service_key(service, spec);
                let err = CartError::PriceUnavailable(key);
                tracing::warn!(error = %err, "add rejected");
                self.notifier.notify(&Notice::alert(err.to_string()));
                Err(err)
            }
        }
    }

    /// First step of a removal: identify the line item to remove.
    pub fn request_removal(&self, index: usize) -> Result<PendingRemoval, CartError> {
        let item = self.cart.get(index).ok_or(CartError::IndexOutOfRange {
            index,
            len: self.cart.len(),
        })?;
        Ok(PendingRemoval {
            index,
            service: item.service.clone(),
        })
    }

    /// Second step of a removal: the user confirmed.
    ///
    /// Fails with [`CartError::StaleRemoval`] if the cart no longer holds
    /// the requested line item at the requested index.
    pub fn confirm_removal(&mut self, pending: PendingRemoval) -> Result<LineItem, CartError> {
        let still_there = self
            .cart
            .get(pending.index)
            .map(|item| item.service == pending.service)
            .unwrap_or(false);
        if !still_there {
            return Err(CartError::StaleRemoval(pending.service));
        }

        let removed = self.cart.remove(pending.index)?;
        self.save();
        tracing::debug!(service = %removed.service, "line item removed");
        self.notifier.notify(&Notice::info(format!(
            "Service \"{}\" removed from the cart.",
            removed.service
        )));
        Ok(removed)
    }

    /// Second step of a removal: the user declined. The cart is unchanged.
    pub fn cancel_removal(&self, pending: PendingRemoval) {
        tracing::debug!(service = %pending.service, "removal cancelled");
    }

    /// Empty the cart and persist.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.save();
    }

    /// Sum of `price * quantity` over all line items.
    pub fn total(&self) -> Money {
        self.cart.total()
    }

    /// Write the cart to storage.
    pub fn persist(&self) -> Result<(), CartError> {
        self.storage.set(keys::CART, &self.cart)?;
        Ok(())
    }

    /// Replace the in-memory cart with the stored one.
    ///
    /// Missing or unreadable data yields an empty cart.
    pub fn restore(&mut self) {
        self.cart = self.storage.get_or_default(keys::CART);
        tracing::debug!(items = self.cart.len(), "cart restored");
    }

    /// Build the display projection.
    pub fn render(&self) -> CartView {
        CartView::of(&self.cart)
    }

    /// The cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// All line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.cart.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// The storage this cart persists to.
    pub fn storage(&self) -> &Store {
        &self.storage
    }

    /// The notification sink.
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    fn save(&self) {
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "failed to persist cart");
        }
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}
