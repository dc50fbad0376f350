//! Remove a line item from the cart.

use anyhow::{bail, Result};
use dialoguer::Confirm;

use super::RemoveArgs;
use crate::context::Context;

/// Run the remove command.
pub async fn run(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let mut checkout = ctx.checkout()?;

    let Some(index) = args.position.checked_sub(1) else {
        bail!("Positions start at 1. See `shop cart`.");
    };
    let pending = checkout.request_removal(index)?;

    let confirmed = args.yes
        || Confirm::new()
            .with_prompt(pending.prompt())
            .default(false)
            .interact()?;

    if !confirmed {
        checkout.cancel_removal(pending);
        ctx.output.info("Nothing removed.");
        return Ok(());
    }

    let removed = checkout.confirm_removal(pending)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "removed": removed,
            "total": checkout.store().total(),
        }));
        return Ok(());
    }

    match checkout.panel().amount_due_label() {
        Some(label) => ctx.output.kv("Cart", &label),
        None => ctx.output.info("Your cart is now empty."),
    }
    Ok(())
}
