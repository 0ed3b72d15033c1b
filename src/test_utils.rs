//! Shared test utilities for the convention register.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        event,
        product::{self, CatalogProduct},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with the schema migrated.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::migrate(&db).await?;
    Ok(db)
}

/// Creates a test event named "Test Con".
pub async fn create_test_event(db: &DatabaseConnection) -> Result<entities::event::Model> {
    event::create_event(db, "Test Con").await
}

/// Creates a product and returns it as the cart sees it.
///
/// # Arguments
/// * `db` - Database connection
/// * `name` - Product name
/// * `price` - Unit price as decimal text
/// * `has_options` - Whether sales carry an option label
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    price: &str,
    has_options: bool,
) -> Result<CatalogProduct> {
    let model = product::create_product(db, name, price, has_options).await?;
    CatalogProduct::try_from(model)
}

/// Sets up a migrated database with one event.
/// Returns (db, event) for order-related tests.
pub async fn setup_with_event() -> Result<(DatabaseConnection, entities::event::Model)> {
    let db = setup_test_db().await?;
    let event = create_test_event(&db).await?;
    Ok((db, event))
}
