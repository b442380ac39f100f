//! Initial data from the `[seed]` section of config.toml.
//!
//! Each table or collection is seeded only while it is empty, so running the
//! seeder on every startup is harmless.

use crate::{
    config::settings::SeedConfig,
    core::{
        collections,
        inventory::{self, NewInventoryItem},
        spare_part::{self, NewSparePart},
        sync::SyncHub,
    },
    entities::{InventoryItem, SparePart},
    errors::Result,
    models::CollectionKey,
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, TransactionTrait};
use serde_json::Value;

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub spare_parts: usize,
    pub inventory_items: usize,
    pub collection_items: usize,
}

/// Inserts seed data into empty tables and collections.
///
/// # Errors
/// Returns an error if a seed entry is invalid or a write fails. Relational
/// seeds are inserted in one transaction per table.
pub async fn seed_initial_data(
    db: &DatabaseConnection,
    hub: &SyncHub,
    seed: &SeedConfig,
) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if !seed.spare_parts.is_empty() && SparePart::find().count(db).await? == 0 {
        let txn = db.begin().await?;
        for part in &seed.spare_parts {
            spare_part::create_spare_part(
                &txn,
                hub,
                NewSparePart {
                    name: part.name.clone(),
                    quantity: part.quantity,
                    location: part.location.clone(),
                    part_number: part.part_number.clone(),
                    category: part.category.clone(),
                    uom: part.uom.clone(),
                    ..Default::default()
                },
            )
            .await?;
        }
        txn.commit().await?;
        report.spare_parts = seed.spare_parts.len();
    }

    if !seed.inventory.is_empty() && InventoryItem::find().count(db).await? == 0 {
        let txn = db.begin().await?;
        for item in &seed.inventory {
            inventory::create_item(
                &txn,
                hub,
                NewInventoryItem {
                    name: item.name.clone(),
                    category: item.category.clone(),
                    current_stock: item.current_stock,
                    min_stock: item.min_stock,
                    max_stock: item.max_stock,
                    unit: Some(item.unit.clone()),
                    location: item.location.clone(),
                    ..Default::default()
                },
            )
            .await?;
        }
        txn.commit().await?;
        report.inventory_items = seed.inventory.len();
    }

    for entry in &seed.collections {
        let key: CollectionKey = entry.key.parse()?;
        if !collections::list_items(db, key).await?.is_empty() {
            tracing::debug!(collection = %key, "collection already has items, skipping seed");
            continue;
        }
        let items = entry
            .items
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<Value>, _>>()?;
        report.collection_items += items.len();
        collections::replace_items(db, hub, key, items).await?;
    }

    if report != SeedReport::default() {
        tracing::info!(
            spare_parts = report.spare_parts,
            inventory_items = report.inventory_items,
            collection_items = report.collection_items,
            "seed data inserted"
        );
    }
    Ok(report)
}
