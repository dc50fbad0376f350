//! Service catalog and the price lookup contract.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Source of unit prices for `service` + optional `spec` selections.
///
/// The same lookup feeds both the displayed and the charged price.
pub trait PriceCatalog {
    /// Unit price for a selection, or `None` when it cannot be priced.
    fn unit_price(&self, service: &str, spec: &str) -> Option<Money>;
}

impl<F> PriceCatalog for F
where
    F: Fn(&str, &str) -> Option<Money>,
{
    fn unit_price(&self, service: &str, spec: &str) -> Option<Money> {
        self(service, spec)
    }
}

/// A price as configured: either an integer amount or a display string
/// such as `"Rp 600.000"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceTag {
    /// Plain amount in Rupiah.
    Amount(u64),
    /// Price text to parse with [`parse_rupiah`].
    Text(String),
}

impl PriceTag {
    /// Resolve to an amount, if the tag holds a readable price.
    pub fn resolve(&self) -> Option<Money> {
        match self {
            PriceTag::Amount(amount) => Some(Money::new(*amount)),
            PriceTag::Text(text) => parse_rupiah(text),
        }
    }
}

/// A specification option of a service (e.g., "Standard", "Premium").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecOption {
    /// Option name, used in the line item key.
    pub name: String,
    /// Option price. Falls back to the service price when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceTag>,
}

/// A purchasable service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    /// Service name.
    pub name: String,
    /// Base price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceTag>,
    /// Selectable specifications.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specs: Vec<SpecOption>,
}

impl ServiceEntry {
    /// Create a service with a base price and no specifications.
    pub fn new(name: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            price: Some(PriceTag::Amount(price)),
            specs: Vec::new(),
        }
    }

    /// Add a specification option.
    pub fn with_spec(mut self, name: impl Into<String>, price: u64) -> Self {
        self.specs.push(SpecOption {
            name: name.into(),
            price: Some(PriceTag::Amount(price)),
        });
        self
    }

    /// Base price, if readable.
    pub fn base_price(&self) -> Option<Money> {
        self.price.as_ref().and_then(PriceTag::resolve)
    }

    /// Price for a spec option of this service.
    ///
    /// An empty spec prices the service itself. A known spec without a
    /// readable price of its own falls back to the base price; an unknown
    /// spec has no price.
    pub fn price_for(&self, spec: &str) -> Option<Money> {
        if spec.is_empty() {
            return self.base_price();
        }
        let option = self.specs.iter().find(|s| s.name == spec)?;
        option
            .price
            .as_ref()
            .and_then(PriceTag::resolve)
            .or_else(|| self.base_price())
    }
}

/// The storefront's service catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Services in display order.
    #[serde(default)]
    pub services: Vec<ServiceEntry>,
}

impl Catalog {
    /// Create a catalog from services.
    pub fn new(services: Vec<ServiceEntry>) -> Self {
        Self { services }
    }

    /// Find a service by name.
    pub fn service(&self, name: &str) -> Option<&ServiceEntry> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Check if the catalog has no services.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl PriceCatalog for Catalog {
    fn unit_price(&self, service: &str, spec: &str) -> Option<Money> {
        self.service(service)?.price_for(spec)
    }
}

/// Extract a Rupiah amount from price text.
///
/// Accepts forms like `"Rp 600.000"`, `"Rp. 1.250.000"` or
/// `"Standard - Rp 600.000 ($40.00)"`. Dots are thousands separators.
pub fn parse_rupiah(text: &str) -> Option<Money> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"(?i)Rp\.?\s*([\d.]+)").expect("static price pattern is valid")
    });

    let digits: String = pattern
        .captures(text)?
        .get(1)?
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    digits.parse().ok().map(Money::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(vec![
            ServiceEntry::new("Hosting", 500_000)
                .with_spec("Standard", 600_000)
                .with_spec("Premium", 900_000),
            ServiceEntry::new("Domain", 150_000),
            ServiceEntry {
                name: "Consulting".to_string(),
                price: None,
                specs: vec![SpecOption {
                    name: "Hourly".to_string(),
                    price: None,
                }],
            },
        ])
    }

    #[test]
    fn test_parse_rupiah() {
        assert_eq!(parse_rupiah("Rp 600.000"), Some(Money::new(600_000)));
        assert_eq!(parse_rupiah("Rp. 1.250.000"), Some(Money::new(1_250_000)));
        assert_eq!(parse_rupiah("rp150.000"), Some(Money::new(150_000)));
        assert_eq!(
            parse_rupiah("Standard - Rp 600.000 ($40.00)"),
            Some(Money::new(600_000))
        );
    }

    #[test]
    fn test_parse_rupiah_rejects_missing_amount() {
        assert_eq!(parse_rupiah("Contact us"), None);
        assert_eq!(parse_rupiah("Rp ."), None);
        assert_eq!(parse_rupiah("$40.00"), None);
    }

    #[test]
    fn test_spec_price_wins() {
        let catalog = sample();
        assert_eq!(
            catalog.unit_price("Hosting", "Premium"),
            Some(Money::new(900_000))
        );
    }

    #[test]
    fn test_empty_spec_uses_base_price() {
        let catalog = sample();
        assert_eq!(catalog.unit_price("Hosting", ""), Some(Money::new(500_000)));
        assert_eq!(catalog.unit_price("Domain", ""), Some(Money::new(150_000)));
    }

    #[test]
    fn test_unknown_lookups_have_no_price() {
        let catalog = sample();
        assert_eq!(catalog.unit_price("Hosting", "Enterprise"), None);
        assert_eq!(catalog.unit_price("Email", ""), None);
        assert_eq!(catalog.unit_price("Consulting", "Hourly"), None);
    }

    #[test]
    fn test_text_price_tags() {
        let toml_like = serde_json::json!({
            "services": [
                { "name": "Hosting", "price": "Rp 500.000",
                  "specs": [{ "name": "Standard", "price": "Standard - Rp 600.000" },
                            { "name": "Basic" }] }
            ]
        });
        let catalog: Catalog = serde_json::from_value(toml_like).unwrap();
        assert_eq!(
            catalog.unit_price("Hosting", "Standard"),
            Some(Money::new(600_000))
        );
        // Spec without its own price falls back to the service price
        assert_eq!(
            catalog.unit_price("Hosting", "Basic"),
            Some(Money::new(500_000))
        );
    }

    #[test]
    fn test_closure_catalog() {
        let fixed = |_: &str, _: &str| Some(Money::new(42));
        assert_eq!(fixed.unit_price("anything", ""), Some(Money::new(42)));
    }
}
