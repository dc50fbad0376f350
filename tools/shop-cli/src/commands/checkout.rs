//! The payment page: show what is owed and pay with the default method.

use anyhow::Result;
use shop_checkout::stored_total;

use super::checkout_failure;
use super::pay::{processing_spinner, report, with_interrupt};
use crate::context::Context;

/// Run the checkout command.
pub async fn run(ctx: &Context) -> Result<()> {
    let storage = ctx.open_storage()?;

    // The total handed over by `shop proceed`, read before the cart is loaded
    let handed_over = stored_total(&storage);

    let mut checkout = ctx.checkout_with(storage)?;

    ctx.output.header("Payment");
    if !handed_over.is_zero() {
        let usd = handed_over.usd_estimate(ctx.config.checkout.usd_rate);
        ctx.output
            .kv("Total to pay", &format!("{} ({})", handed_over.display(), usd));
    }

    let spinner = processing_spinner(ctx, &checkout);
    let result = with_interrupt(checkout.cancel_token(), checkout.auto_trigger()).await;
    spinner.finish_and_clear();

    match result {
        Some(result) => report(result.map_err(checkout_failure)?, &checkout, ctx),
        None => {
            let methods = checkout
                .panel()
                .methods()
                .iter()
                .map(|m| m.name.clone())
                .collect::<Vec<_>>();

            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({
                    "status": "awaiting-method",
                    "methods": methods,
                }));
                return Ok(());
            }

            ctx.output.info(&format!(
                "'{}' is not offered here. Pay with `shop pay <method>`:",
                ctx.config.checkout.auto_method
            ));
            for method in &methods {
                ctx.output.list_item(method);
            }
            Ok(())
        }
    }
}
