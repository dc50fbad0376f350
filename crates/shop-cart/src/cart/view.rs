//! Display projection of a cart.

use serde::Serialize;

use crate::cart::Cart;
use crate::money::Money;

/// One row of the cart listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartRow {
    /// Index to pass to a removal request.
    pub index: usize,
    /// Service key.
    pub service: String,
    /// Quantity.
    pub quantity: u32,
    /// Unit price times quantity.
    pub line_total: Money,
}

/// Snapshot of the cart for display. Rebuilt on demand; never a source of
/// truth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartView {
    /// Rows in cart order.
    pub rows: Vec<CartRow>,
    /// Cart total.
    pub total: Money,
}

impl CartView {
    /// Project a cart.
    pub fn of(cart: &Cart) -> Self {
        let rows = cart
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| CartRow {
                index,
                service: item.service.clone(),
                quantity: item.quantity,
                line_total: item.line_total(),
            })
            .collect();

        Self {
            rows,
            total: cart.total(),
        }
    }

    /// Check if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
