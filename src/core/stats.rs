//! Dashboard aggregation.
//!
//! Totals are computed on demand from the relational tables and the
//! collection documents. A failing spare-part query degrades that figure to 0
//! so the dashboard still renders.

use crate::{
    core::{collections, inventory, spare_part},
    errors::Result,
    models::CollectionKey,
};
use sea_orm::ConnectionTrait;
use serde::Serialize;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    pub spare_parts_total_quantity: i64,
    pub tools_total_quantity: i64,
    pub general_tools_total_quantity: i64,
    pub ppe_total_quantity: i64,
    pub stationery_total_quantity: i64,
    /// Number of faulty-return records, not their quantities
    pub faulty_items_count: i64,
    /// Relational items plus the `inventoryItems` collection
    pub inventory_items_total_quantity: i64,
}

/// Raw quantities are summed first; only the total is floored to a whole,
/// non-negative count.
async fn collection_total<C>(db: &C, key: CollectionKey) -> Result<i64>
where
    C: ConnectionTrait,
{
    let items = collections::list_items(db, key).await?;
    let total = collections::sum_quantity(&items, key.quantity_keys());
    Ok(super::quantity::whole_quantity(total))
}

/// Computes every dashboard figure.
///
/// # Errors
/// Returns an error if a collection or inventory query fails. Spare-part
/// failures are logged and reported as 0.
pub async fn dashboard_counts<C>(db: &C) -> Result<DashboardCounts>
where
    C: ConnectionTrait,
{
    let spare_parts_total_quantity = match spare_part::total_quantity(db).await {
        Ok(total) => total,
        Err(e) => {
            tracing::warn!(error = %e, "spare part totals unavailable, reporting 0");
            0
        }
    };

    let faulty = collections::list_items(db, CollectionKey::FaultyReturns).await?;
    let faulty_items_count = i64::try_from(faulty.len()).unwrap_or(i64::MAX);

    let inventory_items_total_quantity = inventory::total_stock(db)
        .await?
        .saturating_add(collection_total(db, CollectionKey::InventoryItems).await?);

    Ok(DashboardCounts {
        spare_parts_total_quantity,
        tools_total_quantity: collection_total(db, CollectionKey::ToolsItems).await?,
        general_tools_total_quantity: collection_total(db, CollectionKey::GeneralToolsItems).await?,
        ppe_total_quantity: collection_total(db, CollectionKey::PpeItems).await?,
        stationery_total_quantity: collection_total(db, CollectionKey::StationeryItems).await?,
        faulty_items_count,
        inventory_items_total_quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sync::SyncHub;
    use crate::test_utils::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_database_counts_zero() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(dashboard_counts(&db).await?, DashboardCounts::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_counts() -> Result<()> {
        let db = setup_test_db().await?;
        let hub = SyncHub::new();

        create_test_spare_part(&db, "Step Chain", 4).await?;
        create_test_spare_part(&db, "Comb Plate", 6).await?;
        create_test_inventory_item(&db, "AHU Filter", 12, 5).await?;

        collections::replace_items(
            &db,
            &hub,
            CollectionKey::ToolsItems,
            vec![
                json!({ "toolName": "Drill", "qty": 2 }),
                json!({ "toolName": "Multimeter", "quantity": 3, "qty": 99 }),
                json!({ "toolName": "Label only" }),
            ],
        )
        .await?;
        collections::replace_items(
            &db,
            &hub,
            CollectionKey::PpeItems,
            vec![json!({ "itemName": "Gloves", "availableQuantity": 40 })],
        )
        .await?;
        collections::replace_items(
            &db,
            &hub,
            CollectionKey::InventoryItems,
            vec![json!({ "name": "Cable Ties", "current_stock": 100 })],
        )
        .await?;
        collections::replace_items(
            &db,
            &hub,
            CollectionKey::FaultyReturns,
            vec![
                json!({ "name": "Relay", "quantity": 5 }),
                json!({ "name": "Contactor", "quantity": 2 }),
            ],
        )
        .await?;

        let counts = dashboard_counts(&db).await?;
        assert_eq!(counts.spare_parts_total_quantity, 10);
        assert_eq!(counts.tools_total_quantity, 5);
        assert_eq!(counts.general_tools_total_quantity, 0);
        assert_eq!(counts.ppe_total_quantity, 40);
        assert_eq!(counts.stationery_total_quantity, 0);
        assert_eq!(counts.faulty_items_count, 2);
        assert_eq!(counts.inventory_items_total_quantity, 112);
        Ok(())
    }

    #[tokio::test]
    async fn test_collection_totals_sum_before_flooring() -> Result<()> {
        let db = setup_test_db().await?;
        let hub = SyncHub::new();
        collections::replace_items(
            &db,
            &hub,
            CollectionKey::StationeryItems,
            vec![
                json!({ "name": "Paper", "quantity": 2.5 }),
                json!({ "name": "Pens", "quantity": 1.9 }),
                json!({ "name": "Ink", "quantity": -1 }),
            ],
        )
        .await?;
        collections::replace_items(
            &db,
            &hub,
            CollectionKey::GeneralToolsItems,
            vec![json!({ "name": "Ladder", "quantity": -4 })],
        )
        .await?;

        let counts = dashboard_counts(&db).await?;
        assert_eq!(counts.stationery_total_quantity, 3);
        assert_eq!(counts.general_tools_total_quantity, 0);
        Ok(())
    }
}
