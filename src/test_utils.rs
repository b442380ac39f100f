//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    core::{
        inventory::{self, NewInventoryItem},
        spare_part::{self, NewSparePart},
        sync::SyncHub,
        user::{self, NewUser},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Password given to every user made by [`create_test_user`].
pub const TEST_PASSWORD: &str = "password123";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a spare part stored at `"Main Store"`.
pub async fn create_test_spare_part(
    db: &DatabaseConnection,
    name: &str,
    quantity: i64,
) -> Result<entities::spare_part::Model> {
    spare_part::create_spare_part(
        db,
        &SyncHub::new(),
        NewSparePart {
            name: name.to_string(),
            quantity,
            location: "Main Store".to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Creates an inventory item with a reorder level.
///
/// # Defaults
/// * category: "General"
/// * `max_stock`: the larger of `min_stock * 5` and `current_stock`
pub async fn create_test_inventory_item(
    db: &DatabaseConnection,
    name: &str,
    current_stock: i64,
    min_stock: i64,
) -> Result<entities::inventory_item::Model> {
    inventory::create_item(
        db,
        &SyncHub::new(),
        NewInventoryItem {
            name: name.to_string(),
            category: "General".to_string(),
            current_stock,
            min_stock,
            max_stock: (min_stock * 5).max(current_stock),
            ..Default::default()
        },
    )
    .await
}

/// Creates an active user with [`TEST_PASSWORD`].
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
    role: &str,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        NewUser {
            email: email.to_string(),
            display_name: format!("Test {role}"),
            role: role.to_string(),
            password: Some(TEST_PASSWORD.to_string()),
            ..Default::default()
        },
    )
    .await
}
