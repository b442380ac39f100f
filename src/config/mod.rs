/// Database configuration and connection management
pub mod database;

/// Application settings loaded from config.toml
pub mod settings;

/// Development user bootstrap from environment variables
pub mod users;

pub use settings::{AppConfig, ServerConfig, StockThresholds, load_config, load_default_config};
