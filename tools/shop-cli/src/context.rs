//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use shop_cart::CartStore;
use shop_checkout::{CheckoutCoordinator, HttpGateway};
use shop_storage::{FileBackend, Store};

use crate::config::ShopConfig;
use crate::output::Output;

const CONFIG_NAMES: [&str; 3] = ["shop.toml", ".shop.toml", "shop.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: ShopConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Directory relative paths in the config resolve against: the
    /// config file's directory, or the working directory without one.
    pub root: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, root) = if let Some(path) = config_path {
            let config = ShopConfig::load(path)?;
            let root = Path::new(path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.clone());
            (config, root)
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, dir)) => (config, dir),
                None => (ShopConfig::default(), cwd.clone()),
            }
        };

        Ok(Self {
            config,
            output,
            cwd,
            root,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(ShopConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    match ShopConfig::load(config_path.to_str()?) {
                        Ok(config) => return Some((config, current)),
                        Err(e) => tracing::warn!(
                            path = %config_path.display(),
                            error = %e,
                            "skipping unreadable config"
                        ),
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Path of the file backing cart storage.
    pub fn storage_path(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.path)
    }

    /// Open the cart storage.
    pub fn open_storage(&self) -> Result<Store> {
        let path = self.storage_path();
        let backend = FileBackend::open(&path)
            .with_context(|| format!("Failed to open storage: {}", path.display()))?;
        Ok(Store::new(backend))
    }

    /// Open the persisted cart, reporting notices through the output.
    pub fn cart_store(&self, storage: Store) -> CartStore {
        CartStore::open(storage, Arc::new(self.output.clone()))
    }

    /// Build a checkout coordinator over the persisted cart.
    pub fn checkout(&self) -> Result<CheckoutCoordinator<HttpGateway>> {
        self.checkout_with(self.open_storage()?)
    }

    /// Build a checkout coordinator over an already opened storage.
    pub fn checkout_with(&self, storage: Store) -> Result<CheckoutCoordinator<HttpGateway>> {
        let gateway = HttpGateway::new(self.config.gateway_config())
            .context("Failed to create payment gateway client")?;
        Ok(CheckoutCoordinator::new(
            self.cart_store(storage),
            gateway,
            self.config.checkout.methods.clone(),
            self.config.checkout_settings(),
        ))
    }

    /// Resolve a path relative to the config root.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.root.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_found_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("shop.toml"),
            "[storage]\npath = \"data/cart.json\"\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, root) = Context::find_config(&nested).unwrap();
        assert_eq!(config.storage.path, "data/cart.json");
        assert_eq!(root, dir.path());

        let ctx = Context {
            config,
            output: Output::new(false, true),
            cwd: nested,
            root,
        };
        assert_eq!(ctx.storage_path(), dir.path().join("data").join("cart.json"));
    }

    #[test]
    fn test_storage_round_trip_through_context() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            config: ShopConfig::default(),
            output: Output::new(false, true),
            cwd: dir.path().to_path_buf(),
            root: dir.path().to_path_buf(),
        };

        let mut checkout = ctx.checkout().unwrap();
        checkout
            .add_item("Domain", "", shop_cart::Money::new(150_000))
            .unwrap();
        drop(checkout);

        assert!(dir.path().join(".shop").join("storage.json").exists());
        let checkout = ctx.checkout().unwrap();
        assert_eq!(checkout.store().len(), 1);
        assert_eq!(
            checkout.panel().amount_due_label().as_deref(),
            Some("Amount due: Rp 150.000")
        );
    }
}
