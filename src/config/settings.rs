//! Application settings loaded from config.toml
//!
//! The file is optional. It carries the defaults stamped on every order taken at the
//! booth and a list of products to seed into an empty catalog on first run.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "CONVENTION_POS_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Defaults applied to submitted orders
    #[serde(default)]
    pub sale: SaleDefaults,
    /// Products to seed into the catalog
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// Defaults applied to orders when the buyer gives no details
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SaleDefaults {
    /// Sale category label written to `orders.type`
    #[serde(default = "default_order_type")]
    pub order_type: String,
    /// Payment type written to `orders.paymentType`
    #[serde(default = "default_payment_type")]
    pub payment_type: String,
}

impl Default for SaleDefaults {
    fn default() -> Self {
        Self {
            order_type: default_order_type(),
            payment_type: default_payment_type(),
        }
    }
}

fn default_order_type() -> String {
    "Convention Sale".to_string()
}

fn default_payment_type() -> String {
    "Cash".to_string()
}

/// A catalog entry to seed
#[derive(Debug, Deserialize, Clone)]
pub struct ProductSeed {
    /// Product display name
    pub name: String,
    /// Unit price as decimal text (e.g., "3.50")
    pub price: String,
    /// Whether sales of this product carry an option
    #[serde(default)]
    pub has_options: bool,
    /// Option labels to attach to the product
    #[serde(default)]
    pub options: Vec<String>,
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from `$CONVENTION_POS_CONFIG` or `./config.toml`, falling back to
/// defaults when the file does not exist.
pub fn load_app_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        info!("No config file at {path}, using defaults");
        return Ok(AppConfig::default());
    }
    load_config(&path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_app_config() {
        let toml_str = r#"
            [sale]
            order_type = "Artist Alley"
            payment_type = "Card"

            [[products]]
            name = "Sticker"
            price = "3.00"

            [[products]]
            name = "Keychain"
            price = "12.50"
            has_options = true
            options = ["Cat", "Dog"]
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sale.order_type, "Artist Alley");
        assert_eq!(config.sale.payment_type, "Card");
        assert_eq!(config.products.len(), 2);
        assert!(!config.products[0].has_options);
        assert!(config.products[0].options.is_empty());
        assert_eq!(config.products[1].price, "12.50");
        assert_eq!(config.products[1].options, vec!["Cat", "Dog"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.sale, SaleDefaults::default());
        assert_eq!(config.sale.order_type, "Convention Sale");
        assert!(config.products.is_empty());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }
}
