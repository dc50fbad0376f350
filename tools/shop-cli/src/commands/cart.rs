//! Show the cart.

use anyhow::Result;

use crate::context::Context;

/// Run the cart command.
pub async fn run(ctx: &Context) -> Result<()> {
    let checkout = ctx.checkout()?;
    let view = checkout.store().render();

    if ctx.output.is_json() {
        ctx.output.json(&view);
        return Ok(());
    }

    ctx.output.header("Cart");

    if view.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    let width = view
        .rows
        .iter()
        .map(|row| row.service.len())
        .max()
        .unwrap_or(0)
        .max("Service".len());
    let widths = [3, width, 3, 14];

    ctx.output.table_row(&["#", "Service", "Qty", "Total"], &widths);
    for row in &view.rows {
        let position = (row.index + 1).to_string();
        let quantity = row.quantity.to_string();
        let total = row.line_total.display();
        ctx.output.table_row(
            &[position.as_str(), row.service.as_str(), quantity.as_str(), total.as_str()],
            &widths,
        );
    }

    println!();
    if let Some(label) = checkout.panel().amount_due_label() {
        println!("  {}", console::style(label).bold());
    }
    ctx.output
        .debug(&format!("{} line item(s) in {}", view.rows.len(), ctx.storage_path().display()));
    Ok(())
}
