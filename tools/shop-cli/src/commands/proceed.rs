//! Hand the cart over to the payment page.

use anyhow::Result;

use super::checkout_failure;
use crate::context::Context;

/// Run the proceed command.
pub async fn run(ctx: &Context) -> Result<()> {
    let checkout = ctx.checkout()?;
    checkout.proceed_to_payment().map_err(checkout_failure)?;

    let total = checkout.store().total();
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "items": checkout.store().items(),
            "total": total,
        }));
        return Ok(());
    }

    ctx.output.success(&format!(
        "Cart saved. {} to pay.",
        total.display()
    ));
    ctx.output.info("Run `shop checkout` to pay, or `shop pay <method>` to choose a method.");
    Ok(())
}
