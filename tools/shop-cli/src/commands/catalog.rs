//! List the service catalog.

use anyhow::Result;
use serde::Serialize;
use shop_cart::{Money, PriceCatalog};

use crate::context::Context;

#[derive(Serialize)]
struct PriceLine {
    service: String,
    spec: Option<String>,
    price: Option<Money>,
    display: Option<String>,
    usd: Option<String>,
}

/// Run the catalog command.
pub async fn run(ctx: &Context) -> Result<()> {
    let catalog = &ctx.config.catalog;
    let rate = ctx.config.checkout.usd_rate;

    if catalog.is_empty() {
        ctx.output
            .warn("The catalog is empty. Add [[catalog.services]] entries to shop.toml.");
        if ctx.output.is_json() {
            ctx.output.json(&Vec::<PriceLine>::new());
        }
        return Ok(());
    }

    let mut lines = Vec::new();
    for service in &catalog.services {
        if service.specs.is_empty() {
            lines.push(price_line(catalog.unit_price(&service.name, ""), &service.name, None, rate));
        }
        for spec in &service.specs {
            lines.push(price_line(
                catalog.unit_price(&service.name, &spec.name),
                &service.name,
                Some(&spec.name),
                rate,
            ));
        }
    }

    if ctx.output.is_json() {
        ctx.output.json(&lines);
        return Ok(());
    }

    ctx.output.header("Services");
    let mut current: Option<&str> = None;
    for line in &lines {
        if current != Some(line.service.as_str()) {
            println!();
            println!("  {}", console::style(&line.service).bold());
            current = Some(&line.service);
        }

        let price = match (&line.display, &line.usd) {
            (Some(display), Some(usd)) => format!("{} ({})", display, usd),
            _ => console::style("price unavailable").dim().to_string(),
        };
        match &line.spec {
            Some(spec) => ctx.output.list_item(&format!("{} - {}", spec, price)),
            None => ctx.output.list_item(&price),
        }
    }

    println!();
    ctx.output
        .debug(&format!("USD estimates at Rp {} per dollar", Money::new(rate).display_amount()));
    Ok(())
}

fn price_line(price: Option<Money>, service: &str, spec: Option<&str>, rate: u64) -> PriceLine {
    PriceLine {
        service: service.to_string(),
        spec: spec.map(str::to_string),
        price,
        display: price.map(|p| p.display()),
        usd: price.map(|p| p.usd_estimate(rate)),
    }
}
