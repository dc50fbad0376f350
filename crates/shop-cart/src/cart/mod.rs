//! Shopping cart module.
//!
//! Contains the cart and line item types, the persisted cart store and the
//! display projection of a cart.

mod cart;
mod store;
mod view;

pub use cart::{service_key, AddOutcome, Cart, LineItem};
pub use store::{CartStore, PendingRemoval};
pub use view::{CartRow, CartView};
