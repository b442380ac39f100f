//! Application settings loaded from config.toml
//!
//! The file is optional. Every section has defaults so the service starts with
//! an empty or missing config; seed data only applies to empty tables.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Low-stock urgency thresholds
    pub stock_thresholds: StockThresholds,
    /// Initial data inserted into empty tables
    pub seed: SeedConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_addr: String,
    /// How long a sign-in session stays valid
    pub session_ttl_hours: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            session_ttl_hours: 12,
        }
    }
}

/// Thresholds used to classify low-stock items.
///
/// An item is critical below `max(min_stock * critical_ratio, critical_min_items)`
/// and a warning below `max(min_stock * warning_ratio, warning_min_items)`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct StockThresholds {
    pub critical_ratio: f64,
    pub critical_min_items: i64,
    pub warning_ratio: f64,
    pub warning_min_items: i64,
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self {
            critical_ratio: 0.2,
            critical_min_items: 5,
            warning_ratio: 0.5,
            warning_min_items: 15,
        }
    }
}

/// Seed data section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Spare parts to insert when the table is empty
    pub spare_parts: Vec<SparePartSeed>,
    /// Inventory items to insert when the table is empty
    pub inventory: Vec<InventorySeed>,
    /// Collection items to insert when the collection is empty
    pub collections: Vec<CollectionSeed>,
}

/// One seeded spare part
#[derive(Debug, Clone, Deserialize)]
pub struct SparePartSeed {
    pub name: String,
    pub quantity: i64,
    pub location: String,
    #[serde(default)]
    pub part_number: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub uom: Option<String>,
}

/// One seeded inventory item
#[derive(Debug, Clone, Deserialize)]
pub struct InventorySeed {
    pub name: String,
    pub category: String,
    pub current_stock: i64,
    #[serde(default)]
    pub min_stock: i64,
    #[serde(default)]
    pub max_stock: i64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub location: Option<String>,
}

fn default_unit() -> String {
    "pcs".to_string()
}

/// Items for one collection
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSeed {
    /// Collection key, e.g. `"toolsItems"`
    pub key: String,
    /// Items in free-form TOML tables
    pub items: Vec<toml::Table>,
}

/// Loads application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads configuration from `CONFIG_PATH` (default `./config.toml`).
///
/// A missing file yields defaults; an unreadable or invalid file is an error.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        tracing::warn!(path = %path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }
    load_config(path)
}
