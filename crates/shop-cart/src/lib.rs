//! Cart state, pricing and persistence for the services storefront.
//!
//! - **Money**: Rupiah amounts with Indonesian display formatting
//! - **Catalog**: the price lookup contract (service + spec -> unit price)
//! - **Cart**: ordered line items keyed by service, merged on re-add
//! - **CartStore**: the cart plus its storage and notification collaborators
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use shop_cart::prelude::*;
//! use shop_storage::{MemoryBackend, Store};
//!
//! let notifier = Arc::new(MemoryNotifier::new());
//! let mut store = CartStore::open(Store::new(MemoryBackend::new()), notifier.clone());
//!
//! store.add("Hosting", "Standard", Money::new(600_000)).unwrap();
//! store.add("Hosting", "Standard", Money::new(999_999)).unwrap();
//! store.add("Domain", "", Money::new(150_000)).unwrap();
//!
//! assert_eq!(store.len(), 2);
//! assert_eq!(store.items()[0].quantity, 2);
//! assert_eq!(store.total(), Money::new(1_350_000));
//! assert_eq!(store.total().display(), "Rp 1.350.000");
//! ```

pub mod catalog;
pub mod cart;
pub mod error;
pub mod money;
pub mod notify;

pub use cart::{service_key, AddOutcome, Cart, CartRow, CartStore, CartView, LineItem, PendingRemoval};
pub use catalog::{parse_rupiah, Catalog, PriceCatalog, PriceTag, ServiceEntry, SpecOption};
pub use error::CartError;
pub use money::Money;
pub use notify::{MemoryNotifier, Notice, Notifier, Severity};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{AddOutcome, Cart, CartRow, CartStore, CartView, LineItem, PendingRemoval};
    pub use crate::catalog::{Catalog, PriceCatalog};
    pub use crate::error::CartError;
    pub use crate::money::Money;
    pub use crate::notify::{MemoryNotifier, Notice, Notifier, Severity};
}
