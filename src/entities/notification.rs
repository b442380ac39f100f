//! Notification entity - In-app notices about requisitions, issuances and gate passes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// `"requisition"`, `"issuance"`, `"gate_pass"` or `"system"`
    pub kind: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    /// Arbitrary payload (ids of the related records)
    pub data: Option<Json>,
    pub created_at: DateTimeUtc,
}

/// `Notification` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
