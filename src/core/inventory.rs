//! Inventory business logic - Generic stocked items with reorder levels.
//!
//! Provides CRUD, search and the strict stock update for relational inventory
//! items, plus the low-stock report with urgency levels. Name-based
//! requisition adjustments go through [`crate::core::quantity`] instead.

use crate::{
    config::StockThresholds,
    core::{
        optional,
        quantity::{self, ChangeContext, LedgerRecord},
        required,
        sync::SyncHub,
    },
    entities::{InventoryItem, inventory_item},
    errors::{Error, Result},
    models::{RequisitionType, StockCategory, Urgency},
};
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use serde::{Deserialize, Serialize};

const SYNC_SOURCE: &str = "inventory";

/// Fields for a new inventory item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewInventoryItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub current_stock: i64,
    #[serde(default)]
    pub min_stock: i64,
    #[serde(default)]
    pub max_stock: i64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
}

/// Partial update; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryItemChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub current_stock: Option<i64>,
    pub min_stock: Option<i64>,
    pub max_stock: Option<i64>,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub supplier: Option<String>,
    pub cost: Option<f64>,
}

/// A low-stock item with its urgency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockItem {
    #[serde(flatten)]
    pub item: inventory_item::Model,
    pub urgency: Urgency,
}

fn validate_levels(current: i64, min: i64, max: i64) -> Result<()> {
    if current < 0 || min < 0 || max < 0 {
        return Err(Error::validation("stock levels cannot be negative"));
    }
    if max > 0 && min > max {
        return Err(Error::validation(format!(
            "min_stock ({min}) cannot exceed max_stock ({max})"
        )));
    }
    Ok(())
}

fn validate_cost(cost: Option<f64>) -> Result<()> {
    match cost {
        Some(cost) if !cost.is_finite() || cost < 0.0 => {
            Err(Error::validation("cost must be a non-negative number"))
        }
        _ => Ok(()),
    }
}

/// Classifies how urgently an item at `current` stock needs reordering.
#[must_use]
pub fn classify_urgency(current: i64, min_stock: i64, thresholds: &StockThresholds) -> Urgency {
    // Cast safety: stock counts are far below 2^53.
    #[allow(clippy::cast_precision_loss)]
    let (current, min_stock) = (current as f64, min_stock as f64);
    #[allow(clippy::cast_precision_loss)]
    let critical = (min_stock * thresholds.critical_ratio).max(thresholds.critical_min_items as f64);
    #[allow(clippy::cast_precision_loss)]
    let warning = (min_stock * thresholds.warning_ratio).max(thresholds.warning_min_items as f64);

    if current < critical {
        Urgency::Critical
    } else if current < warning {
        Urgency::Warning
    } else {
        Urgency::Low
    }
}

/// All inventory items, alphabetically.
pub async fn get_all_items(db: &DatabaseConnection) -> Result<Vec<inventory_item::Model>> {
    InventoryItem::find()
        .order_by_asc(inventory_item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn get_item_by_id<C>(db: &C, id: i64) -> Result<Option<inventory_item::Model>>
where
    C: ConnectionTrait,
{
    InventoryItem::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Finds an item by name, ignoring case and surrounding whitespace.
pub async fn find_by_name<C>(db: &C, name: &str) -> Result<Option<inventory_item::Model>>
where
    C: ConnectionTrait,
{
    let wanted = super::name_key(name);
    let rows = InventoryItem::find()
        .order_by_asc(inventory_item::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().find(|row| super::name_key(&row.name) == wanted))
}

pub async fn get_items_by_category(
    db: &DatabaseConnection,
    category: &str,
) -> Result<Vec<inventory_item::Model>> {
    InventoryItem::find()
        .filter(inventory_item::Column::Category.eq(category))
        .order_by_asc(inventory_item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Substring search over name, description and category.
pub async fn search_items(
    db: &DatabaseConnection,
    term: &str,
) -> Result<Vec<inventory_item::Model>> {
    let term = term.trim();
    if term.is_empty() {
        return get_all_items(db).await;
    }

    InventoryItem::find()
        .filter(
            Condition::any()
                .add(inventory_item::Column::Name.contains(term))
                .add(inventory_item::Column::Description.contains(term))
                .add(inventory_item::Column::Category.contains(term)),
        )
        .order_by_asc(inventory_item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Items at or below their reorder level, most urgent first.
pub async fn get_low_stock_items(
    db: &DatabaseConnection,
    thresholds: &StockThresholds,
) -> Result<Vec<LowStockItem>> {
    let items = InventoryItem::find()
        .filter(
            Expr::col(inventory_item::Column::CurrentStock)
                .lte(Expr::col(inventory_item::Column::MinStock)),
        )
        .order_by_asc(inventory_item::Column::CurrentStock)
        .order_by_asc(inventory_item::Column::Name)
        .all(db)
        .await?;

    let mut low: Vec<LowStockItem> = items
        .into_iter()
        .map(|item| LowStockItem {
            urgency: classify_urgency(item.current_stock, item.min_stock, thresholds),
            item,
        })
        .collect();
    low.sort_by_key(|entry| match entry.urgency {
        Urgency::Critical => 0,
        Urgency::Warning => 1,
        Urgency::Low => 2,
    });
    Ok(low)
}

/// Sum of `current_stock` over all relational items.
pub async fn total_stock<C>(db: &C) -> Result<i64>
where
    C: ConnectionTrait,
{
    let items = InventoryItem::find().all(db).await?;
    Ok(items.iter().map(|item| item.current_stock.max(0)).sum())
}

/// Creates an inventory item.
///
/// # Errors
/// Returns a validation error if the name or category is blank, a stock level
/// is negative, `min_stock` exceeds `max_stock`, or the cost is invalid.
pub async fn create_item<C>(
    db: &C,
    hub: &SyncHub,
    new: NewInventoryItem,
) -> Result<inventory_item::Model>
where
    C: ConnectionTrait,
{
    let name = required("name", &new.name)?;
    let category = required("category", &new.category)?;
    validate_levels(new.current_stock, new.min_stock, new.max_stock)?;
    validate_cost(new.cost)?;

    let now = chrono::Utc::now();
    let item = inventory_item::ActiveModel {
        name: Set(name),
        description: Set(optional(new.description)),
        category: Set(category),
        current_stock: Set(new.current_stock),
        min_stock: Set(new.min_stock),
        max_stock: Set(new.max_stock),
        unit: Set(optional(new.unit).unwrap_or_else(|| "pcs".to_string())),
        location: Set(optional(new.location)),
        supplier: Set(optional(new.supplier)),
        cost: Set(new.cost),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    hub.publish(SYNC_SOURCE);
    tracing::info!(id = item.id, name = %item.name, "inventory item created");
    Ok(item)
}

/// Applies a partial update.
pub async fn update_item(
    db: &DatabaseConnection,
    hub: &SyncHub,
    id: i64,
    changes: InventoryItemChanges,
) -> Result<inventory_item::Model> {
    let item = get_item_by_id(db, id)
        .await?
        .ok_or_else(|| Error::not_found("inventory item", id))?;

    validate_levels(
        changes.current_stock.unwrap_or(item.current_stock),
        changes.min_stock.unwrap_or(item.min_stock),
        changes.max_stock.unwrap_or(item.max_stock),
    )?;
    validate_cost(changes.cost)?;

    let mut active: inventory_item::ActiveModel = item.into();
    if let Some(name) = changes.name {
        active.name = Set(required("name", &name)?);
    }
    if let Some(category) = changes.category {
        active.category = Set(required("category", &category)?);
    }
    if changes.description.is_some() {
        active.description = Set(optional(changes.description));
    }
    if let Some(current) = changes.current_stock {
        active.current_stock = Set(current);
    }
    if let Some(min) = changes.min_stock {
        active.min_stock = Set(min);
    }
    if let Some(max) = changes.max_stock {
        active.max_stock = Set(max);
    }
    if let Some(unit) = optional(changes.unit) {
        active.unit = Set(unit);
    }
    if changes.location.is_some() {
        active.location = Set(optional(changes.location));
    }
    if changes.supplier.is_some() {
        active.supplier = Set(optional(changes.supplier));
    }
    if changes.cost.is_some() {
        active.cost = Set(changes.cost);
    }
    active.updated_at = Set(chrono::Utc::now());

    let updated = active.update(db).await?;
    hub.publish(SYNC_SOURCE);
    Ok(updated)
}

pub async fn delete_item(db: &DatabaseConnection, hub: &SyncHub, id: i64) -> Result<()> {
    let result = InventoryItem::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("inventory item", id));
    }
    hub.publish(SYNC_SOURCE);
    tracing::info!(id, "inventory item deleted");
    Ok(())
}

/// Records a stock change against an item id, refusing to go below zero.
///
/// The previous and new quantities are written to the ledger in the same
/// database transaction as the stock update.
///
/// # Errors
/// - [`Error::ItemNotFound`] if the item does not exist
/// - [`Error::InsufficientStock`] if the result would be negative
pub async fn update_stock(
    db: &DatabaseConnection,
    hub: &SyncHub,
    id: i64,
    change: i64,
    kind: Option<RequisitionType>,
    context: &ChangeContext,
) -> Result<inventory_item::Model> {
    let txn = db.begin().await?;

    let item = get_item_by_id(&txn, id)
        .await?
        .ok_or_else(|| Error::ItemNotFound {
            name: id.to_string(),
        })?;

    // Cast safety: only used to report the rejected change.
    #[allow(clippy::cast_precision_loss)]
    let new_stock = item.current_stock.checked_add(change).ok_or(Error::InvalidQuantity {
        quantity: change as f64,
    })?;
    if new_stock < 0 {
        return Err(Error::InsufficientStock {
            current: item.current_stock,
            requested: change,
        });
    }

    let previous_stock = item.current_stock;
    let mut active: inventory_item::ActiveModel = item.into();
    active.current_stock = Set(new_stock);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(&txn).await?;

    // Cast safety: stock counts are far below 2^53.
    #[allow(clippy::cast_precision_loss)]
    let quantity_change = change as f64;
    quantity::record_ledger(
        &txn,
        LedgerRecord {
            category: StockCategory::Inventory.as_str(),
            item_name: &updated.name,
            quantity_change,
            requisition_type: kind.map_or(quantity::UNKNOWN_TYPE, RequisitionType::as_str),
            previous_quantity: previous_stock,
            new_quantity: new_stock,
            context,
        },
    )
    .await?;

    txn.commit().await?;
    hub.publish(SYNC_SOURCE);
    tracing::info!(
        id,
        previous = previous_stock,
        new = new_stock,
        "inventory stock updated"
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_classify_urgency_thresholds() {
        let t = StockThresholds::default();
        // small reorder levels fall back to the item floors
        assert_eq!(classify_urgency(4, 10, &t), Urgency::Critical);
        assert_eq!(classify_urgency(5, 10, &t), Urgency::Warning);
        assert_eq!(classify_urgency(14, 10, &t), Urgency::Warning);
        assert_eq!(classify_urgency(15, 20, &t), Urgency::Low);
        // large reorder levels scale
        assert_eq!(classify_urgency(39, 200, &t), Urgency::Critical);
        assert_eq!(classify_urgency(40, 200, &t), Urgency::Warning);
        assert_eq!(classify_urgency(100, 200, &t), Urgency::Low);
    }

    #[tokio::test]
    async fn test_create_item_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let hub = SyncHub::new();

        let result = create_item(
            &db,
            &hub,
            NewInventoryItem {
                name: String::new(),
                category: "HVAC".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = create_item(
            &db,
            &hub,
            NewInventoryItem {
                name: "Filter".to_string(),
                category: "HVAC".to_string(),
                min_stock: 30,
                max_stock: 10,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = create_item(
            &db,
            &hub,
            NewInventoryItem {
                name: "Filter".to_string(),
                category: "HVAC".to_string(),
                cost: Some(f64::NAN),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_search_and_category() -> Result<()> {
        let db = setup_test_db().await?;
        let hub = SyncHub::new();
        let item = create_item(
            &db,
            &hub,
            NewInventoryItem {
                name: "  Door Operator Belt ".to_string(),
                description: Some("Elevator landing door".to_string()),
                category: "Elevator".to_string(),
                current_stock: 8,
                min_stock: 2,
                max_stock: 20,
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(item.name, "Door Operator Belt");
        assert_eq!(item.unit, "pcs");
        create_test_inventory_item(&db, "AHU Filter", 30, 10).await?;

        assert_eq!(search_items(&db, "landing").await?.len(), 1);
        assert_eq!(search_items(&db, "filter").await?.len(), 1);
        assert_eq!(get_items_by_category(&db, "Elevator").await?.len(), 1);
        assert_eq!(get_all_items(&db).await?.len(), 2);
        assert_eq!(total_stock(&db).await?, 38);
        assert!(find_by_name(&db, "door operator BELT").await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_low_stock_items_sorted_by_urgency() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_inventory_item(&db, "Plenty", 50, 10).await?;
        create_test_inventory_item(&db, "Warning", 10, 12).await?;
        create_test_inventory_item(&db, "Empty", 0, 3).await?;
        create_test_inventory_item(&db, "At Level", 20, 20).await?;

        let low = get_low_stock_items(&db, &StockThresholds::default()).await?;
        let names: Vec<_> = low.iter().map(|entry| entry.item.name.as_str()).collect();
        assert_eq!(names, vec!["Empty", "Warning", "At Level"]);
        assert_eq!(low[0].urgency, Urgency::Critical);
        assert_eq!(low[1].urgency, Urgency::Warning);
        assert_eq!(low[2].urgency, Urgency::Low);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_item_partial() -> Result<()> {
        let db = setup_test_db().await?;
        let hub = SyncHub::new();
        let item = create_test_inventory_item(&db, "Fuse 10A", 40, 10).await?;

        let updated = update_item(
            &db,
            &hub,
            item.id,
            InventoryItemChanges {
                supplier: Some("Acme Electrical".to_string()),
                min_stock: Some(15),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.supplier.as_deref(), Some("Acme Electrical"));
        assert_eq!(updated.min_stock, 15);
        assert_eq!(updated.current_stock, 40);

        let result = update_item(&db, &hub, 404, InventoryItemChanges::default()).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_stock_records_ledger() -> Result<()> {
        let db = setup_test_db().await?;
        let hub = SyncHub::new();
        let item = create_test_inventory_item(&db, "Fuse 10A", 5, 2).await?;
        let ctx = ChangeContext {
            user_id: "tech-7".to_string(),
            reason: "panel repair".to_string(),
            department: Some("Power".to_string()),
            ..Default::default()
        };

        let updated = update_stock(&db, &hub, item.id, -3, Some(RequisitionType::Consume), &ctx).await?;
        assert_eq!(updated.current_stock, 2);

        let result = update_stock(&db, &hub, item.id, -3, Some(RequisitionType::Consume), &ctx).await;
        assert!(matches!(result, Err(Error::InsufficientStock { current: 2, .. })));

        let ledger = quantity::list_updates(&db).await?;
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].requisition_type, "consume");
        assert_eq!(ledger[0].previous_quantity, 5);
        assert_eq!(ledger[0].new_quantity, 2);
        assert_eq!(ledger[0].department.as_deref(), Some("Power"));

        delete_item(&db, &hub, item.id).await?;
        assert!(get_item_by_id(&db, item.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_stock_boundaries() -> Result<()> {
        let db = setup_test_db().await?;
        let hub = SyncHub::new();
        let item = create_test_inventory_item(&db, "Contactor", 5, 2).await?;
        let ctx = ChangeContext {
            user_id: "tech-7".to_string(),
            reason: "stock take".to_string(),
            ..Default::default()
        };

        let result = update_stock(&db, &hub, item.id, i64::MAX, None, &ctx).await;
        assert!(matches!(result, Err(Error::InvalidQuantity { .. })));

        let emptied = update_stock(&db, &hub, item.id, -5, Some(RequisitionType::Issue), &ctx).await?;
        assert_eq!(emptied.current_stock, 0);

        let result = update_stock(&db, &hub, item.id, -1, Some(RequisitionType::Issue), &ctx).await;
        assert!(matches!(
            result,
            Err(Error::InsufficientStock {
                current: 0,
                requested: -1
            })
        ));
        assert_eq!(get_item_by_id(&db, item.id).await?.unwrap().current_stock, 0);
        assert_eq!(quantity::list_updates(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_name_folds_non_ascii() -> Result<()> {
        let db = setup_test_db().await?;
        let item = create_test_inventory_item(&db, "ÉCLAIRAGE Lamp", 4, 1).await?;

        let found = find_by_name(&db, "éclairage lamp").await?;
        assert_eq!(found.map(|i| i.id), Some(item.id));
        Ok(())
    }
}
