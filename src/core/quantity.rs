//! Quantity business logic - Stock adjustments driven by requisitions.
//!
//! An adjustment looks an item up by name (ignoring case), turns the
//! requisition type into a signed delta, clamps the result to a non-negative
//! whole number, writes it back and records a ledger row. Spare parts and
//! inventory items are adjusted inside a database transaction; collection
//! items are rewritten as a whole document and carry no stronger guarantee
//! than last-write-wins.
//!
//! Strict updates (`update_stock` in the inventory and spare-part modules)
//! share the ledger but refuse to go below zero instead of clamping.

use crate::{
    core::{collections, inventory, spare_part, sync::SyncHub},
    entities::{QuantityUpdate, quantity_update},
    errors::{Error, Result},
    models::{CollectionKey, RequisitionType, StockCategory},
};
use chrono::{DateTime, Utc};
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ledger type used when a change did not come from a known requisition type.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Signed change for a requisition.
///
/// Returns add `quantity`; issues and consumptions remove it; anything else
/// leaves stock untouched.
#[must_use]
pub fn quantity_delta(kind: Option<RequisitionType>, quantity: f64) -> f64 {
    match kind {
        Some(RequisitionType::Return) => quantity,
        Some(RequisitionType::Issue | RequisitionType::Consume) => -quantity,
        None => 0.0,
    }
}

/// New quantity after applying `delta`: floored and never below zero.
#[must_use]
pub fn apply_delta(old: f64, delta: f64) -> i64 {
    whole_quantity(old + delta)
}

/// Floors a quantity to a whole number, clamping negatives and NaN to zero.
#[must_use]
pub fn whole_quantity(value: f64) -> i64 {
    let floored = value.floor();
    if floored.is_nan() || floored <= 0.0 {
        return 0;
    }
    // Cast safety: floored is positive; values beyond i64::MAX saturate.
    #[allow(clippy::cast_possible_truncation)]
    let whole = floored as i64;
    whole
}

/// Who made a stock change and why.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeContext {
    pub user_id: String,
    pub reason: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Fields of one ledger row.
#[derive(Debug, Clone)]
pub struct LedgerRecord<'a> {
    pub category: &'a str,
    pub item_name: &'a str,
    pub quantity_change: f64,
    pub requisition_type: &'a str,
    pub previous_quantity: i64,
    pub new_quantity: i64,
    pub context: &'a ChangeContext,
}

/// Appends a row to the quantity ledger.
pub async fn record_ledger<C>(db: &C, record: LedgerRecord<'_>) -> Result<quantity_update::Model>
where
    C: ConnectionTrait,
{
    let ctx = record.context;
    quantity_update::ActiveModel {
        category: Set(record.category.to_string()),
        item_name: Set(record.item_name.to_string()),
        quantity_change: Set(record.quantity_change),
        requisition_type: Set(record.requisition_type.to_string()),
        reason: Set(ctx.reason.clone()),
        user_id: Set(ctx.user_id.clone()),
        previous_quantity: Set(record.previous_quantity),
        new_quantity: Set(record.new_quantity),
        location: Set(ctx.location.clone()),
        department: Set(ctx.department.clone()),
        notes: Set(ctx.notes.clone()),
        timestamp: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// A name-based adjustment request.
#[derive(Debug, Clone)]
pub struct AdjustRequest {
    pub category: StockCategory,
    pub item_name: String,
    /// `None` when the requisition type was not recognised; the delta is then 0
    pub kind: Option<RequisitionType>,
    pub quantity: f64,
    pub context: ChangeContext,
}

/// Outcome of a successful adjustment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Adjustment {
    pub category: StockCategory,
    /// Where the item was found (`"spare_parts"`, `"inventory"` or a collection key)
    pub source: String,
    /// Item name as stored
    pub item_name: String,
    pub delta: f64,
    pub previous_quantity: i64,
    pub new_quantity: i64,
    /// Id of the ledger row
    pub ledger_id: i64,
}

struct Applied {
    source: String,
    item_name: String,
    previous_quantity: i64,
    new_quantity: i64,
}

/// Applies a requisition to the named item.
///
/// Returns `Ok(None)` when no item in the category has that name; nothing is
/// written in that case.
///
/// # Errors
/// Returns an error if `quantity` is not finite or a database operation fails.
pub async fn adjust_item_quantity(
    db: &DatabaseConnection,
    hub: &SyncHub,
    request: &AdjustRequest,
) -> Result<Option<Adjustment>> {
    if !request.quantity.is_finite() {
        return Err(Error::InvalidQuantity {
            quantity: request.quantity,
        });
    }

    let delta = quantity_delta(request.kind, request.quantity);
    let txn = db.begin().await?;

    let applied = match request.category {
        StockCategory::SpareParts => adjust_spare_part(&txn, &request.item_name, delta).await?,
        StockCategory::Inventory => {
            match adjust_inventory_item(&txn, &request.item_name, delta).await? {
                Some(applied) => Some(applied),
                None => {
                    adjust_collection_item(&txn, CollectionKey::InventoryItems, &request.item_name, delta)
                        .await?
                }
            }
        }
        other => match other.collection() {
            Some(key) => adjust_collection_item(&txn, key, &request.item_name, delta).await?,
            None => None,
        },
    };

    let Some(applied) = applied else {
        txn.rollback().await?;
        tracing::debug!(
            category = %request.category,
            item = %request.item_name,
            "no item with that name, quantity left untouched"
        );
        return Ok(None);
    };

    let ledger = record_ledger(
        &txn,
        LedgerRecord {
            category: request.category.as_str(),
            item_name: &applied.item_name,
            quantity_change: delta,
            requisition_type: request.kind.map_or(UNKNOWN_TYPE, RequisitionType::as_str),
            previous_quantity: applied.previous_quantity,
            new_quantity: applied.new_quantity,
            context: &request.context,
        },
    )
    .await?;

    txn.commit().await?;
    hub.publish(applied.source.clone());

    tracing::info!(
        category = %request.category,
        item = %applied.item_name,
        previous = applied.previous_quantity,
        new = applied.new_quantity,
        "item quantity adjusted"
    );

    Ok(Some(Adjustment {
        category: request.category,
        source: applied.source,
        item_name: applied.item_name,
        delta,
        previous_quantity: applied.previous_quantity,
        new_quantity: applied.new_quantity,
        ledger_id: ledger.id,
    }))
}

async fn adjust_spare_part<C>(db: &C, name: &str, delta: f64) -> Result<Option<Applied>>
where
    C: ConnectionTrait,
{
    let Some(part) = spare_part::find_by_name(db, name).await? else {
        return Ok(None);
    };

    // Cast safety: stock counts are far below 2^53.
    #[allow(clippy::cast_precision_loss)]
    let new_quantity = apply_delta(part.quantity as f64, delta);
    let previous_quantity = part.quantity;
    let item_name = part.name.clone();

    let mut active: crate::entities::spare_part::ActiveModel = part.into();
    active.quantity = Set(new_quantity);
    active.updated_at = Set(Utc::now());
    active.update(db).await?;

    Ok(Some(Applied {
        source: StockCategory::SpareParts.as_str().to_string(),
        item_name,
        previous_quantity,
        new_quantity,
    }))
}

async fn adjust_inventory_item<C>(db: &C, name: &str, delta: f64) -> Result<Option<Applied>>
where
    C: ConnectionTrait,
{
    let Some(item) = inventory::find_by_name(db, name).await? else {
        return Ok(None);
    };

    // Cast safety: stock counts are far below 2^53.
    #[allow(clippy::cast_precision_loss)]
    let new_quantity = apply_delta(item.current_stock as f64, delta);
    let previous_quantity = item.current_stock;
    let item_name = item.name.clone();

    let mut active: crate::entities::inventory_item::ActiveModel = item.into();
    active.current_stock = Set(new_quantity);
    active.updated_at = Set(Utc::now());
    active.update(db).await?;

    Ok(Some(Applied {
        source: StockCategory::Inventory.as_str().to_string(),
        item_name,
        previous_quantity,
        new_quantity,
    }))
}

async fn adjust_collection_item<C>(
    db: &C,
    key: CollectionKey,
    name: &str,
    delta: f64,
) -> Result<Option<Applied>>
where
    C: ConnectionTrait,
{
    let mut items = collections::list_items(db, key).await?;
    let Some(index) = collections::find_by_name(&items, name) else {
        return Ok(None);
    };

    let keys = key.quantity_keys();
    let (field, old) = collections::item_quantity(&items[index], keys).unwrap_or((keys[0], 0.0));
    let new_quantity = apply_delta(old, delta);
    let item_name = collections::item_name(&items[index])
        .unwrap_or(name)
        .to_string();

    if let Value::Object(map) = &mut items[index] {
        map.insert(field.to_string(), Value::from(new_quantity));
        map.insert("lastUpdated".to_string(), Value::from(Utc::now().to_rfc3339()));
    }
    collections::write_items(db, key, items).await?;

    Ok(Some(Applied {
        source: key.as_str().to_string(),
        item_name,
        previous_quantity: whole_quantity(old),
        new_quantity,
    }))
}

/// Ledger rows, newest first.
pub async fn list_updates(db: &DatabaseConnection) -> Result<Vec<quantity_update::Model>> {
    QuantityUpdate::find()
        .order_by_desc(quantity_update::Column::Timestamp)
        .order_by_desc(quantity_update::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Filters for ledger queries. Empty filter returns everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerFilter {
    /// Exact item name, ignoring case
    pub item_name: Option<String>,
    pub user_id: Option<String>,
    /// Requisition type name
    pub requisition_type: Option<String>,
    /// Substring of reason, notes, location or department
    pub q: Option<String>,
    /// Inclusive lower bound
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound
    pub to: Option<DateTime<Utc>>,
}

/// Ledger rows matching every set filter, newest first.
pub async fn query_updates(
    db: &DatabaseConnection,
    filter: &LedgerFilter,
) -> Result<Vec<quantity_update::Model>> {
    let mut query = QuantityUpdate::find();

    if let Some(user_id) = &filter.user_id {
        query = query.filter(quantity_update::Column::UserId.eq(user_id.as_str()));
    }
    if let Some(kind) = &filter.requisition_type {
        query = query.filter(quantity_update::Column::RequisitionType.eq(kind.trim().to_lowercase()));
    }
    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(quantity_update::Column::Reason.contains(q))
                .add(quantity_update::Column::Notes.contains(q))
                .add(quantity_update::Column::Location.contains(q))
                .add(quantity_update::Column::Department.contains(q)),
        );
    }
    if let Some(from) = filter.from {
        query = query.filter(quantity_update::Column::Timestamp.gte(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(quantity_update::Column::Timestamp.lte(to));
    }

    let mut rows = query
        .order_by_desc(quantity_update::Column::Timestamp)
        .order_by_desc(quantity_update::Column::Id)
        .all(db)
        .await?;
    if let Some(name) = &filter.item_name {
        let wanted = super::name_key(name);
        rows.retain(|row| super::name_key(&row.item_name) == wanted);
    }
    Ok(rows)
}
