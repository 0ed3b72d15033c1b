/// Database connection and schema migration
pub mod database;

/// Sale defaults and catalog seed loading from config.toml
pub mod settings;
