//! CLI command implementations.

pub mod add;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod pay;
pub mod proceed;
pub mod remove;

use clap::{Args, Subcommand};
use shop_cart::CartError;
use shop_checkout::CheckoutError;

/// A failure the user has already been shown through a notice.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Reported(pub String);

/// Convert a checkout error, marking the ones that raised a notice.
pub fn checkout_failure(err: CheckoutError) -> anyhow::Error {
    match err {
        CheckoutError::EmptyCart | CheckoutError::Cart(CartError::PriceUnavailable(_)) => {
            Reported(err.to_string()).into()
        }
        other => other.into(),
    }
}

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Service name as listed by `shop catalog`.
    pub service: String,

    /// Specification of the service (e.g., "Standard").
    #[arg(short, long, default_value = "")]
    pub spec: String,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Position of the line item as listed by `shop cart` (starting at 1).
    pub position: usize,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the pay command.
#[derive(Args)]
pub struct PayArgs {
    /// Payment method (e.g., QRIS, BCA).
    pub method: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
