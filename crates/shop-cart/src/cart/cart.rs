//! Cart and line item types.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CartError;
use crate::money::Money;

/// Build the line item key for a service and an optional specification.
///
/// ```
/// use shop_cart::service_key;
/// assert_eq!(service_key("Hosting", "Standard"), "Hosting (Standard)");
/// assert_eq!(service_key("Domain", ""), "Domain");
/// ```
pub fn service_key(service: &str, spec: &str) -> String {
    if spec.is_empty() {
        service.to_string()
    } else {
        format!("{} ({})", service, spec)
    }
}

fn default_quantity() -> u32 {
    1
}

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Service key, optionally suffixed with the chosen spec.
    pub service: String,
    /// Unit price, fixed when the item was first added.
    pub price: Money,
    /// Quantity (at least 1).
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl LineItem {
    /// Create a line item with quantity 1.
    pub fn new(service: impl Into<String>, price: Money) -> Self {
        Self {
            service: service.into(),
            price,
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// Result of adding to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line item was appended at `index`.
    Inserted { index: usize },
    /// An existing line item at `index` now has `quantity`.
    Merged { index: usize, quantity: u32 },
}

impl AddOutcome {
    /// Index of the affected line item.
    pub fn index(&self) -> usize {
        match self {
            AddOutcome::Inserted { index } | AddOutcome::Merged { index, .. } => *index,
        }
    }
}

/// An ordered collection of line items with unique service keys.
///
/// Serializes as a plain JSON array of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored items, restoring the cart invariants.
    ///
    /// Zero quantities become 1. Repeated keys are merged into the first
    /// occurrence, keeping its price.
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Cart::new();
        for mut item in items {
            item.quantity = item.quantity.max(1);
            match cart.position(&item.service) {
                Some(index) => {
                    let existing = &mut cart.items[index];
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Add one unit of `key`.
    ///
    /// An existing key gains one unit and keeps its original price;
    /// `unit_price` only applies to a new line item.
    pub fn add(&mut self, key: impl Into<String>, unit_price: Money) -> Result<AddOutcome, CartError> {
        let key = key.into();

        if let Some(index) = self.position(&key) {
            let existing = &mut self.items[index];
            existing.quantity = existing
                .quantity
                .checked_add(1)
                .ok_or(CartError::QuantityOverflow(key))?;
            return Ok(AddOutcome::Merged {
                index,
                quantity: existing.quantity,
            });
        }

        self.items.push(LineItem::new(key, unit_price));
        Ok(AddOutcome::Inserted {
            index: self.items.len() - 1,
        })
    }

    /// Remove and return the line item at `index`.
    pub fn remove(&mut self, index: usize) -> Result<LineItem, CartError> {
        if index >= self.items.len() {
            return Err(CartError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price * quantity` over all line items.
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Total units across all line items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Index of the line item with `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|i| i.service == key)
    }

    /// Line item at `index`.
    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    /// All line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<LineItem>::deserialize(deserializer).map(Cart::from_items)
    }
}

impl FromIterator<LineItem> for Cart {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        Cart::from_items(iter)
    }
}
