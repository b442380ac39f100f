//! Issuance requisition entity - Multi-line request for items to be issued.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Issuance requisition database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "issuance_requisitions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-facing number (e.g., `"IR-20250114-003"`)
    #[sea_orm(unique)]
    pub requisition_number: String,
    pub department: String,
    pub request_date: Date,
    /// Date the items are needed by
    pub required_date: Option<Date>,
    /// `low`, `medium`, `high` or `urgent`
    pub priority: String,
    /// `pending`, `approved`, `rejected` or `completed`
    pub status: String,
    /// JSON array of `{item_code, item_description, unit, quantity, remarks}`
    pub items: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
