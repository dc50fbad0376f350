//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    let config = &ctx.config;

    ctx.output.info("[storage]");
    ctx.output.kv("path", &ctx.storage_path().display().to_string());

    ctx.output.info("");
    ctx.output.info("[gateway]");
    ctx.output.kv("endpoint", &config.gateway.endpoint);
    ctx.output
        .kv("connect_timeout_ms", &config.gateway.connect_timeout_ms.to_string());
    ctx.output.kv("timeout_ms", &config.gateway.timeout_ms.to_string());
    if config.gateway.api_token.is_some() {
        ctx.output.kv("api_token", "(set)");
    }

    ctx.output.info("");
    ctx.output.info("[checkout]");
    ctx.output.kv("methods", &config.checkout.methods.join(", "));
    ctx.output.kv("auto_method", &config.checkout.auto_method);
    ctx.output.kv("contact", &config.checkout.contact);
    ctx.output.kv("usd_rate", &config.checkout.usd_rate.to_string());

    if !config.catalog.is_empty() {
        ctx.output.info("");
        ctx.output.info("Services:");
        for service in &config.catalog.services {
            ctx.output.list_item(&service.name);
        }
    }

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("shop.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let errors = ctx.config.validate();
    let mut warnings: Vec<String> = Vec::new();

    if ctx.config.catalog.is_empty() {
        warnings.push("catalog has no services; nothing can be added to the cart".to_string());
    }
    if ctx.config.gateway.connect_timeout_ms > ctx.config.gateway.timeout_ms {
        warnings.push("gateway.connect_timeout_ms exceeds gateway.timeout_ms".to_string());
    }

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
