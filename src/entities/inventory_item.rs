//! Inventory item entity - Generic stocked items with min/max levels.
//!
//! `current_stock` is never negative. Low-stock detection compares it with
//! `min_stock`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inventory item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Item name (e.g., "Elevator Door Motor")
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Category used for filtering (e.g., "Elevator", "HVAC")
    pub category: String,
    /// Quantity on hand
    pub current_stock: i64,
    /// Reorder threshold
    pub min_stock: i64,
    /// Upper stocking level
    pub max_stock: i64,
    /// Unit of measure (e.g., "pcs")
    pub unit: String,
    /// Storage location
    pub location: Option<String>,
    /// Supplier name
    pub supplier: Option<String>,
    /// Unit cost
    pub cost: Option<f64>,
    /// When the item was created
    pub created_at: DateTimeUtc,
    /// When the item was last modified
    pub updated_at: DateTimeUtc,
}

/// Inventory items have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
