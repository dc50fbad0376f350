//! Durable key-value storage for the storefront.
//!
//! Values are stored as strings, the same shape a browser's local storage
//! offers. [`Store`] layers automatic JSON serialization on top of any
//! [`KvBackend`].
//!
//! # Example
//!
//! ```rust
//! use shop_storage::{MemoryBackend, Store};
//!
//! let store = Store::new(MemoryBackend::new());
//!
//! store.set("totalPrice", &750_000u64).unwrap();
//! let total: Option<u64> = store.get("totalPrice").unwrap();
//! assert_eq!(total, Some(750_000));
//!
//! // Malformed or missing values fall back to the default.
//! let missing: Vec<String> = store.get_or_default("cart");
//! assert!(missing.is_empty());
//! ```

mod backend;
mod error;
mod kv;

pub use backend::{FileBackend, KvBackend, MemoryBackend};
pub use error::StorageError;
pub use kv::Store;

/// Well-known storage keys.
pub mod keys {
    /// Serialized cart line items.
    pub const CART: &str = "cart";
    /// Cart total as a decimal integer, read by the payment page.
    pub const TOTAL_PRICE: &str = "totalPrice";
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FileBackend, KvBackend, MemoryBackend, StorageError, Store};
}
