//! Quantity update entity - Ledger of every stock change.
//!
//! Each row records the quantity before and after the change so the history
//! of an item can be audited without replaying deltas.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Quantity update database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quantity_updates")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Stock category name the item belongs to
    pub category: String,
    /// Name of the item as stored
    pub item_name: String,
    /// Signed change that was requested
    pub quantity_change: f64,
    /// `"issue"`, `"return"` or `"consume"`; `"adjust"` for manual corrections
    pub requisition_type: String,
    pub reason: String,
    /// User who made the change
    pub user_id: String,
    /// Quantity before the change
    pub previous_quantity: i64,
    /// Quantity after the change
    pub new_quantity: i64,
    pub location: Option<String>,
    pub department: Option<String>,
    pub notes: Option<String>,
    /// When the change was made
    pub timestamp: DateTimeUtc,
}

/// `QuantityUpdate` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
