//! Checkout error types.

use std::time::Duration;

use shop_cart::CartError;
use thiserror::Error;

/// Error type for payment gateway calls.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("request error: {0}")]
    Request(String),

    #[error("payment cancelled")]
    Cancelled,
}

/// Errors that prevent a checkout operation from starting.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no items.
    #[error("Your cart is empty. Please add a service first.")]
    EmptyCart,

    /// Another payment attempt has not finished yet.
    #[error("A payment is already being processed")]
    PaymentInProgress,

    /// The payment method is not offered.
    #[error("Unknown payment method: {0}")]
    UnknownMethod(String),

    /// The payment method is offered but currently hidden or disabled.
    #[error("Payment method {0} is not available right now")]
    MethodUnavailable(String),

    /// Cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),
}
