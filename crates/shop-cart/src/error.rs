//! Cart error types.

use shop_storage::StorageError;
use thiserror::Error;

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// No line item at the given index.
    #[error("No cart item at index {index} (cart has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The cart changed between a removal request and its confirmation.
    #[error("Cart changed before removal of \"{0}\" was confirmed")]
    StaleRemoval(String),

    /// No unit price could be determined for the item.
    #[error("Unable to determine the price for \"{0}\"")]
    PriceUnavailable(String),

    /// Quantity would exceed the representable maximum.
    #[error("Quantity overflow for \"{0}\"")]
    QuantityOverflow(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
