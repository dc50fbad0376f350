//! Add a service to the cart.

use anyhow::Result;

use super::{checkout_failure, AddArgs};
use crate::context::Context;

/// Run the add command.
pub async fn run(args: AddArgs, ctx: &Context) -> Result<()> {
    let mut checkout = ctx.checkout()?;

    let item = checkout
        .add_from_catalog(&ctx.config.catalog, &args.service, &args.spec)
        .map_err(checkout_failure)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "item": item,
            "total": checkout.store().total(),
        }));
        return Ok(());
    }

    ctx.output.kv("Quantity", &item.quantity.to_string());
    if let Some(label) = checkout.panel().amount_due_label() {
        ctx.output.kv("Cart", &label);
    }
    Ok(())
}
