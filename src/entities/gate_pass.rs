//! Gate pass entity - Authorizes items leaving through a checkpoint.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Gate pass database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gate_passes")]
pub struct Model {
    /// Unique identifier for the gate pass
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Printed pass number (e.g., `"GP-20250114-1736860000000"`)
    #[sea_orm(unique)]
    pub pass_number: String,
    /// Requisition the pass was raised for, if any
    pub requisition_id: Option<i64>,
    pub requester_name: Option<String>,
    pub department: Option<String>,
    pub destination: Option<String>,
    pub purpose: Option<String>,
    pub items_description: Option<String>,
    pub quantity_summary: Option<String>,
    /// ISO date the items are expected back
    pub expected_return_date: Option<String>,
    /// `"pending"`, `"approved"` or `"rejected"`
    pub approval_status: String,
    pub approved_by: Option<String>,
    pub approval_date: Option<DateTimeUtc>,
    /// Deactivated passes are no longer honoured at the gate
    pub is_active: bool,
    pub notes: Option<String>,
    /// Receiver block (name, department, signature, contact, ...)
    pub receiver: Option<Json>,
    pub created_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

/// `GatePass` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
