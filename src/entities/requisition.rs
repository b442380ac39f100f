//! Requisition entity - Issue, return and consume transactions against an item.
//!
//! A requisition names its item by category (`item_type`) and name rather
//! than by id, because most categories live in schemaless collections. The
//! stock adjustment is applied when the requisition is completed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Requisition database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requisitions")]
pub struct Model {
    /// Unique identifier for the requisition
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-facing reference (e.g., `"REQ-20250114-042"`)
    #[sea_orm(unique)]
    pub reference_number: String,
    /// User who raised the requisition
    pub user_id: String,
    /// Stock category name (e.g., `"ppe"`, `"spare_parts"`)
    pub item_type: String,
    /// Item name, matched case-insensitively
    pub item_name: String,
    /// Requested quantity
    pub quantity: f64,
    /// `"issue"`, `"return"` or `"consume"`
    pub requisition_type: String,
    /// `"pending"`, `"approved"`, `"rejected"` or `"completed"`
    pub status: String,
    /// `"low"`, `"medium"`, `"high"` or `"urgent"`
    pub priority: String,
    /// Why the items are needed
    pub reason: String,
    /// Person or team receiving the items
    pub issued_to: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    /// When the requisition was raised
    pub requested_at: DateTimeUtc,
    /// When it was approved or rejected
    pub approved_at: Option<DateTimeUtc>,
    /// Who approved or rejected it
    pub approved_by: Option<String>,
    /// When it was completed and stock was adjusted
    pub completed_at: Option<DateTimeUtc>,
}

/// `Requisition` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
