//! Shop CLI - Command line storefront for the services cart and checkout.
//!
//! Commands:
//! - `shop catalog` - List services and their prices
//! - `shop add` - Add a service to the cart
//! - `shop cart` - Show the cart and the amount due
//! - `shop remove` - Remove a line item from the cart
//! - `shop proceed` - Hand the cart over to the payment page
//! - `shop pay` - Pay for the cart with a payment method
//! - `shop checkout` - Open the payment page and pay with the default method
//! - `shop config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{AddArgs, ConfigArgs, PayArgs, RemoveArgs, Reported};

/// Shop CLI - Browse services, manage the cart and pay
#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List services and their prices
    Catalog,

    /// Add one unit of a service to the cart
    Add(AddArgs),

    /// Show the cart and the amount due
    Cart,

    /// Remove a line item from the cart
    Remove(RemoveArgs),

    /// Hand the cart over to the payment page
    Proceed,

    /// Pay for the cart with a payment method
    Pay(PayArgs),

    /// Open the payment page and pay with the default method
    Checkout,

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Library diagnostics go to stderr; user-facing messages go through Output
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    let result = match cli.command {
        Commands::Catalog => commands::catalog::run(&ctx).await,
        Commands::Add(args) => commands::add::run(args, &ctx).await,
        Commands::Cart => commands::cart::run(&ctx).await,
        Commands::Remove(args) => commands::remove::run(args, &ctx).await,
        Commands::Proceed => commands::proceed::run(&ctx).await,
        Commands::Pay(args) => commands::pay::run(args, &ctx).await,
        Commands::Checkout => commands::checkout::run(&ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        // Notices already told the user what went wrong
        if e.downcast_ref::<Reported>().is_none() {
            ctx.output.error(&format!("{:#}", e));
        }
        std::process::exit(1);
    }

    Ok(())
}
