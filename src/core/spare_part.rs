//! Spare part business logic - O&M and PMA spare parts.
//!
//! Spare parts are the one item category kept purely relational. Every write
//! publishes a `spare_parts` sync event so open views refresh.

use crate::{
    core::{
        optional,
        quantity::{self, ChangeContext, LedgerRecord},
        required,
        sync::SyncHub,
    },
    entities::{SparePart, spare_part},
    errors::{Error, Result},
    models::{RequisitionType, StockCategory},
};
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;

const SYNC_SOURCE: &str = "spare_parts";

/// Fields for a new spare part.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSparePart {
    pub name: String,
    #[serde(default)]
    pub quantity: i64,
    pub location: String,
    #[serde(default)]
    pub item_code: Option<String>,
    #[serde(default)]
    pub imis_code: Option<String>,
    #[serde(default)]
    pub uom: Option<String>,
    #[serde(default)]
    pub part_number: Option<String>,
    #[serde(default)]
    pub boq_number: Option<String>,
    #[serde(default)]
    pub belongs_to: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Partial update; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparePartChanges {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub location: Option<String>,
    pub item_code: Option<String>,
    pub imis_code: Option<String>,
    pub uom: Option<String>,
    pub part_number: Option<String>,
    pub boq_number: Option<String>,
    pub belongs_to: Option<String>,
    pub category: Option<String>,
}

/// All spare parts, alphabetically.
pub async fn get_all_spare_parts(db: &DatabaseConnection) -> Result<Vec<spare_part::Model>> {
    SparePart::find()
        .order_by_asc(spare_part::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn get_spare_part_by_id<C>(db: &C, id: i64) -> Result<Option<spare_part::Model>>
where
    C: ConnectionTrait,
{
    SparePart::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Finds a spare part by name, ignoring case and surrounding whitespace.
pub async fn find_by_name<C>(db: &C, name: &str) -> Result<Option<spare_part::Model>>
where
    C: ConnectionTrait,
{
    let wanted = super::name_key(name);
    let rows = SparePart::find()
        .order_by_asc(spare_part::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().find(|row| super::name_key(&row.name) == wanted))
}

pub async fn get_spare_parts_by_category(
    db: &DatabaseConnection,
    category: &str,
) -> Result<Vec<spare_part::Model>> {
    SparePart::find()
        .filter(spare_part::Column::Category.eq(category))
        .order_by_asc(spare_part::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Parts that have run out.
pub async fn get_low_stock_spare_parts(db: &DatabaseConnection) -> Result<Vec<spare_part::Model>> {
    SparePart::find()
        .filter(spare_part::Column::Quantity.lte(0))
        .order_by_asc(spare_part::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Substring search over name, part number, item code, IMIS code and category.
pub async fn search_spare_parts(
    db: &DatabaseConnection,
    term: &str,
) -> Result<Vec<spare_part::Model>> {
    let term = term.trim();
    if term.is_empty() {
        return get_all_spare_parts(db).await;
    }

    SparePart::find()
        .filter(
            Condition::any()
                .add(spare_part::Column::Name.contains(term))
                .add(spare_part::Column::PartNumber.contains(term))
                .add(spare_part::Column::ItemCode.contains(term))
                .add(spare_part::Column::ImisCode.contains(term))
                .add(spare_part::Column::Category.contains(term)),
        )
        .order_by_asc(spare_part::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sum of all spare part quantities.
pub async fn total_quantity<C>(db: &C) -> Result<i64>
where
    C: ConnectionTrait,
{
    let parts = SparePart::find().all(db).await?;
    Ok(parts.iter().map(|part| part.quantity.max(0)).sum())
}

/// Creates a spare part.
///
/// # Errors
/// Returns a validation error if the name or location is blank or the
/// quantity is negative.
pub async fn create_spare_part<C>(
    db: &C,
    hub: &SyncHub,
    new: NewSparePart,
) -> Result<spare_part::Model>
where
    C: ConnectionTrait,
{
    let name = required("name", &new.name)?;
    let location = required("location", &new.location)?;
    if new.quantity < 0 {
        return Err(Error::validation("quantity cannot be negative"));
    }

    let part = spare_part::ActiveModel {
        name: Set(name),
        quantity: Set(new.quantity),
        location: Set(location),
        item_code: Set(optional(new.item_code)),
        imis_code: Set(optional(new.imis_code)),
        uom: Set(optional(new.uom)),
        part_number: Set(optional(new.part_number)),
        boq_number: Set(optional(new.boq_number)),
        belongs_to: Set(optional(new.belongs_to)),
        category: Set(optional(new.category)),
        updated_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    hub.publish(SYNC_SOURCE);
    tracing::info!(id = part.id, name = %part.name, "spare part created");
    Ok(part)
}

/// Applies a partial update.
pub async fn update_spare_part(
    db: &DatabaseConnection,
    hub: &SyncHub,
    id: i64,
    changes: SparePartChanges,
) -> Result<spare_part::Model> {
    let part = get_spare_part_by_id(db, id)
        .await?
        .ok_or_else(|| Error::not_found("spare part", id))?;

    let mut active: spare_part::ActiveModel = part.into();
    if let Some(name) = changes.name {
        active.name = Set(required("name", &name)?);
    }
    if let Some(quantity) = changes.quantity {
        if quantity < 0 {
            return Err(Error::validation("quantity cannot be negative"));
        }
        active.quantity = Set(quantity);
    }
    if let Some(location) = changes.location {
        active.location = Set(required("location", &location)?);
    }
    if changes.item_code.is_some() {
        active.item_code = Set(optional(changes.item_code));
    }
    if changes.imis_code.is_some() {
        active.imis_code = Set(optional(changes.imis_code));
    }
    if changes.uom.is_some() {
        active.uom = Set(optional(changes.uom));
    }
    if changes.part_number.is_some() {
        active.part_number = Set(optional(changes.part_number));
    }
    if changes.boq_number.is_some() {
        active.boq_number = Set(optional(changes.boq_number));
    }
    if changes.belongs_to.is_some() {
        active.belongs_to = Set(optional(changes.belongs_to));
    }
    if changes.category.is_some() {
        active.category = Set(optional(changes.category));
    }
    active.updated_at = Set(chrono::Utc::now());

    let updated = active.update(db).await?;
    hub.publish(SYNC_SOURCE);
    Ok(updated)
}

pub async fn delete_spare_part(db: &DatabaseConnection, hub: &SyncHub, id: i64) -> Result<()> {
    let result = SparePart::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("spare part", id));
    }
    hub.publish(SYNC_SOURCE);
    tracing::info!(id, "spare part deleted");
    Ok(())
}

/// Changes a part's quantity by `change`, refusing to go below zero.
///
/// Unlike a requisition adjustment this does not clamp: a change that would
/// leave a negative quantity fails with [`Error::InsufficientStock`] and
/// nothing is written.
pub async fn update_stock(
    db: &DatabaseConnection,
    hub: &SyncHub,
    id: i64,
    change: i64,
    kind: Option<RequisitionType>,
    context: &ChangeContext,
) -> Result<spare_part::Model> {
    let txn = db.begin().await?;

    let part = get_spare_part_by_id(&txn, id)
        .await?
        .ok_or_else(|| Error::ItemNotFound {
            name: id.to_string(),
        })?;

    // Cast safety: only used to report the rejected change.
    #[allow(clippy::cast_precision_loss)]
    let new_quantity = part.quantity.checked_add(change).ok_or(Error::InvalidQuantity {
        quantity: change as f64,
    })?;
    if new_quantity < 0 {
        return Err(Error::InsufficientStock {
            current: part.quantity,
            requested: change,
        });
    }

    let previous_quantity = part.quantity;
    let mut active: spare_part::ActiveModel = part.into();
    active.quantity = Set(new_quantity);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(&txn).await?;

    // Cast safety: stock counts are far below 2^53.
    #[allow(clippy::cast_precision_loss)]
    let quantity_change = change as f64;
    quantity::record_ledger(
        &txn,
        LedgerRecord {
            category: StockCategory::SpareParts.as_str(),
            item_name: &updated.name,
            quantity_change,
            requisition_type: kind.map_or(quantity::UNKNOWN_TYPE, RequisitionType::as_str),
            previous_quantity,
            new_quantity,
            context,
        },
    )
    .await?;

    txn.commit().await?;
    hub.publish(SYNC_SOURCE);
    Ok(updated)
}
