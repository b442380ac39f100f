//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL.

use crate::entities::{
    Dataset, GatePass, InventoryItem, IssuanceRecord, IssuanceRequisition, Notification,
    QuantityUpdate, Requisition, Session, SparePart, User,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/em_inventory.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    tracing::debug!(url = %database_url, "connecting to database");
    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table_for<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all tables that do not exist yet.
///
/// Safe to call on every startup.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table_for(db, &schema, User).await?;
    create_table_for(db, &schema, Session).await?;
    create_table_for(db, &schema, InventoryItem).await?;
    create_table_for(db, &schema, SparePart).await?;
    create_table_for(db, &schema, Dataset).await?;
    create_table_for(db, &schema, Requisition).await?;
    create_table_for(db, &schema, QuantityUpdate).await?;
    create_table_for(db, &schema, GatePass).await?;
    create_table_for(db, &schema, IssuanceRecord).await?;
    create_table_for(db, &schema, IssuanceRequisition).await?;
    create_table_for(db, &schema, Notification).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        DatasetModel, InventoryItemModel, RequisitionModel, SparePartModel, UserModel,
    };
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<InventoryItemModel> = InventoryItem::find().limit(1).all(&db).await?;
        let _: Vec<SparePartModel> = SparePart::find().limit(1).all(&db).await?;
        let _: Vec<DatasetModel> = Dataset::find().limit(1).all(&db).await?;
        let _: Vec<RequisitionModel> = Requisition::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
