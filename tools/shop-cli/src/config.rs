//! CLI configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shop_cart::money::DEFAULT_USD_RATE;
use shop_cart::{Catalog, PriceCatalog};
use shop_checkout::{
    CheckoutSettings, GatewayConfig, DEFAULT_AUTO_METHOD, DEFAULT_CONTACT, DEFAULT_ENDPOINT,
};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Payment gateway configuration.
    #[serde(default)]
    pub gateway: GatewaySection,

    /// Checkout configuration.
    #[serde(default)]
    pub checkout: CheckoutSection,

    /// Service catalog.
    #[serde(default)]
    pub catalog: Catalog,
}

impl ShopConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Gateway client settings.
    pub fn gateway_config(&self) -> GatewayConfig {
        let mut config = GatewayConfig::new(&self.gateway.endpoint);
        config.connect_timeout = Duration::from_millis(self.gateway.connect_timeout_ms);
        config.timeout = Duration::from_millis(self.gateway.timeout_ms);
        if let Some(ref token) = self.gateway.api_token {
            config = config.with_api_token(token);
        }
        config
    }

    /// Checkout coordinator settings.
    pub fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            auto_method: self.checkout.auto_method.clone(),
            contact: self.checkout.contact.clone(),
            timeout: Duration::from_millis(self.gateway.timeout_ms),
        }
    }

    /// Check the config for values the storefront cannot work with.
    ///
    /// Returns one message per problem; an empty list means the config is
    /// usable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.storage.path.trim().is_empty() {
            problems.push("storage.path must not be empty".to_string());
        }

        let endpoint = &self.gateway.endpoint;
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            problems.push(format!("gateway.endpoint is not an HTTP URL: {}", endpoint));
        }
        if self.gateway.timeout_ms == 0 {
            problems.push("gateway.timeout_ms must be greater than zero".to_string());
        }
        if self.gateway.connect_timeout_ms == 0 {
            problems.push("gateway.connect_timeout_ms must be greater than zero".to_string());
        }

        if self.checkout.methods.is_empty() {
            problems.push("checkout.methods must list at least one method".to_string());
        }
        if !self.checkout.methods.contains(&self.checkout.auto_method) {
            problems.push(format!(
                "checkout.auto_method '{}' is not one of checkout.methods",
                self.checkout.auto_method
            ));
        }
        if self.checkout.usd_rate == 0 {
            problems.push("checkout.usd_rate must be greater than zero".to_string());
        }

        for service in &self.catalog.services {
            if self.catalog.unit_price(&service.name, "").is_none() && service.specs.is_empty() {
                problems.push(format!("service '{}' has no readable price", service.name));
            }
            for spec in &service.specs {
                if self.catalog.unit_price(&service.name, &spec.name).is_none() {
                    problems.push(format!(
                        "spec '{}' of service '{}' has no readable price",
                        spec.name, service.name
                    ));
                }
            }
        }

        problems
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File backing the cart storage, relative to the config file.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

fn default_storage_path() -> String {
    ".shop/storage.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Payment gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySection {
    /// Payment authorization endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Connection timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Upper bound on one payment request in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Bearer token for the endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_timeout_ms: default_connect_timeout_ms(),
            timeout_ms: default_timeout_ms(),
            api_token: None,
        }
    }
}

/// Checkout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSection {
    /// Payment methods offered, in display order.
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,

    /// Method paid with automatically by `shop checkout`.
    #[serde(default = "default_auto_method")]
    pub auto_method: String,

    /// Contact shown after a confirmed payment.
    #[serde(default = "default_contact")]
    pub contact: String,

    /// Rupiah per US dollar for price estimates.
    #[serde(default = "default_usd_rate")]
    pub usd_rate: u64,
}

fn default_methods() -> Vec<String> {
    ["QRIS", "BCA", "Mandiri", "OVO", "GoPay"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_auto_method() -> String {
    DEFAULT_AUTO_METHOD.to_string()
}

fn default_contact() -> String {
    DEFAULT_CONTACT.to_string()
}

fn default_usd_rate() -> u64 {
    DEFAULT_USD_RATE
}

impl Default for CheckoutSection {
    fn default() -> Self {
        Self {
            methods: default_methods(),
            auto_method: default_auto_method(),
            contact: default_contact(),
            usd_rate: default_usd_rate(),
        }
    }
}

/// Generate a default shop.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Storefront configuration

[storage]
path = ".shop/storage.json"

[gateway]
endpoint = "{endpoint}"
connect_timeout_ms = 5000
timeout_ms = 30000
# api_token = "..."

[checkout]
methods = ["QRIS", "BCA", "Mandiri", "OVO", "GoPay"]
auto_method = "{auto_method}"
contact = "{contact}"
usd_rate = {usd_rate}

[[catalog.services]]
name = "Hosting"
price = 300000
specs = [
    {{ name = "Basic", price = 300000 }},
    {{ name = "Standard", price = "Rp 600.000" }},
    {{ name = "Premium", price = "Rp 1.200.000" }},
]

[[catalog.services]]
name = "Domain"
price = "Rp 150.000"

[[catalog.services]]
name = "Website Maintenance"
price = 450000
specs = [
    {{ name = "Monthly" }},
    {{ name = "Yearly", price = 4500000 }},
]
"#,
        endpoint = DEFAULT_ENDPOINT,
        auto_method = DEFAULT_AUTO_METHOD,
        contact = DEFAULT_CONTACT,
        usd_rate = DEFAULT_USD_RATE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_cart::Money;

    #[test]
    fn test_default_config_parses_and_validates() {
        let config: ShopConfig = toml::from_str(&generate_default_config()).unwrap();
        assert!(config.validate().is_empty(), "{:?}", config.validate());

        assert_eq!(config.catalog.services.len(), 3);
        assert_eq!(
            config.catalog.unit_price("Hosting", "Standard"),
            Some(Money::new(600_000))
        );
        assert_eq!(
            config.catalog.unit_price("Domain", ""),
            Some(Money::new(150_000))
        );
        // Spec without its own price uses the service price
        assert_eq!(
            config.catalog.unit_price("Website Maintenance", "Monthly"),
            Some(Money::new(450_000))
        );
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: ShopConfig = toml::from_str("").unwrap();
        assert_eq!(config.storage.path, ".shop/storage.json");
        assert_eq!(config.gateway.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.checkout.auto_method, "QRIS");
        assert_eq!(config.checkout.usd_rate, 15_000);
        assert!(config.catalog.is_empty());
    }

    #[test]
    fn test_settings_conversion() {
        let config: ShopConfig = toml::from_str(
            r#"
            [gateway]
            endpoint = "http://localhost:8080/pay"
            timeout_ms = 1500
            api_token = "secret"

            [checkout]
            contact = "support@example.com"
            "#,
        )
        .unwrap();

        let gateway = config.gateway_config();
        assert_eq!(gateway.endpoint, "http://localhost:8080/pay");
        assert_eq!(gateway.timeout, Duration::from_millis(1500));
        assert_eq!(gateway.connect_timeout, Duration::from_secs(5));
        assert_eq!(gateway.api_token.as_deref(), Some("secret"));

        let settings = config.checkout_settings();
        assert_eq!(settings.timeout, Duration::from_millis(1500));
        assert_eq!(settings.contact, "support@example.com");
    }

    #[test]
    fn test_validate_reports_problems() {
        let config: ShopConfig = toml::from_str(
            r#"
            [gateway]
            endpoint = "ftp://gateway"
            timeout_ms = 0

            [checkout]
            methods = ["BCA"]
            usd_rate = 0

            [[catalog.services]]
            name = "Consulting"
            price = "call us"
            "#,
        )
        .unwrap();

        let problems = config.validate();
        assert_eq!(problems.len(), 5, "{:?}", problems);
        assert!(problems.iter().any(|p| p.contains("auto_method 'QRIS'")));
        assert!(problems.iter().any(|p| p.contains("'Consulting'")));
    }

    #[test]
    fn test_load_toml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut config: ShopConfig = toml::from_str(&generate_default_config()).unwrap();
        config.checkout.auto_method = "BCA".to_string();

        let toml_path = dir.path().join("shop.toml");
        std::fs::write(&toml_path, toml::to_string_pretty(&config).unwrap()).unwrap();
        let json_path = dir.path().join("shop.json");
        std::fs::write(&json_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        for path in [toml_path, json_path] {
            let loaded = ShopConfig::load(path.to_str().unwrap()).unwrap();
            assert_eq!(loaded.checkout.auto_method, "BCA");
            assert_eq!(loaded.catalog, config.catalog);
        }
    }

    #[test]
    fn test_load_reports_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.toml");
        std::fs::write(&path, "[checkout\nmethods = 1").unwrap();

        let err = ShopConfig::load(path.to_str().unwrap()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse TOML config"));
    }
}
