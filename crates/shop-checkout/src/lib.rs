//! Payment gating and payment authorization flow for the services storefront.
//!
//! This crate provides:
//! - `PaymentGateway` - the external payment-authorization service seam
//! - `HttpGateway` - JSON-over-HTTP gateway client with timeouts
//! - `PaymentPanel` - display state of the payment surfaces
//! - `CheckoutCoordinator` - drives the payment round-trip from cart state
//!
//! # Example
//!
//! ```rust,ignore
//! let store = CartStore::open(storage, notifier);
//! let gateway = HttpGateway::new(GatewayConfig::default())?;
//! let mut checkout = CheckoutCoordinator::new(store, gateway, ["QRIS", "BCA"], CheckoutSettings::default());
//!
//! match checkout.initiate_payment("QRIS").await? {
//!     PaymentOutcome::Confirmed { .. } => assert!(checkout.store().is_empty()),
//!     _ => {}
//! }
//! ```

mod coordinator;
mod error;
mod gateway;
mod panel;

pub use coordinator::*;
pub use error::*;
pub use gateway::*;
pub use panel::*;
