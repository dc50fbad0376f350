//! Pay for the cart.

use std::future::Future;

use anyhow::{bail, Result};
use indicatif::ProgressBar;
use shop_checkout::{CheckoutCoordinator, HttpGateway, PaymentOutcome};
use tokio_util::sync::CancellationToken;

use super::{checkout_failure, PayArgs, Reported};
use crate::context::Context;

/// Run the pay command.
pub async fn run(args: PayArgs, ctx: &Context) -> Result<()> {
    let mut checkout = ctx.checkout()?;

    if !checkout.panel().has_method(&args.method) {
        bail!(
            "Unknown payment method '{}'. Available: {}",
            args.method,
            ctx.config.checkout.methods.join(", ")
        );
    }

    let spinner = processing_spinner(ctx, &checkout);
    let result = with_interrupt(checkout.cancel_token(), checkout.initiate_payment(&args.method)).await;
    spinner.finish_and_clear();

    report(result.map_err(checkout_failure)?, &checkout, ctx)
}

/// Processing indicator shown while a payment request is outstanding.
pub(super) fn processing_spinner(
    ctx: &Context,
    checkout: &CheckoutCoordinator<HttpGateway>,
) -> ProgressBar {
    // An empty cart never reaches the gateway
    if checkout.store().is_empty() {
        return ProgressBar::hidden();
    }
    ctx.output.spinner("Processing payment... (Ctrl-C to cancel)")
}

/// Drive `fut` to completion, cancelling `token` on Ctrl-C.
pub(super) async fn with_interrupt<F: Future>(token: CancellationToken, fut: F) -> F::Output {
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received, cancelling payment");
            token.cancel();
        }
    });

    let output = fut.await;
    watcher.abort();
    output
}

/// Print the result of a payment attempt. Anything but a confirmation is
/// an error exit.
pub(super) fn report(
    outcome: PaymentOutcome,
    checkout: &CheckoutCoordinator<HttpGateway>,
    ctx: &Context,
) -> Result<()> {
    let confirmed_at = checkout.panel().success().map(|banner| banner.confirmed_at);

    if ctx.output.is_json() {
        let summary = match &outcome {
            PaymentOutcome::Confirmed { method, total } => serde_json::json!({
                "status": "confirmed",
                "method": method,
                "total": total,
                "confirmedAt": confirmed_at,
            }),
            PaymentOutcome::Rejected { method, message } => serde_json::json!({
                "status": "rejected",
                "method": method,
                "message": message,
            }),
            PaymentOutcome::Failed { method, error } => serde_json::json!({
                "status": "failed",
                "method": method,
                "error": error.to_string(),
            }),
        };
        ctx.output.json(&summary);
    }

    match outcome {
        PaymentOutcome::Confirmed { method, total } => {
            ctx.output.kv("Paid", &total.display());
            ctx.output.kv("Method", &method);
            if let Some(at) = confirmed_at {
                ctx.output
                    .kv("Confirmed at", &at.format("%Y-%m-%d %H:%M:%S UTC").to_string());
            }
            Ok(())
        }
        PaymentOutcome::Rejected { message, .. } => Err(Reported(message).into()),
        PaymentOutcome::Failed { error, .. } => Err(Reported(error.to_string()).into()),
    }
}
