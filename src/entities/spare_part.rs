//! Spare part entity - O&M / PMA spare parts kept in the relational store.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Spare part database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "spare_parts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    /// Quantity on hand, never negative
    pub quantity: i64,
    pub location: String,
    pub item_code: Option<String>,
    pub imis_code: Option<String>,
    /// Unit of measure
    pub uom: Option<String>,
    pub part_number: Option<String>,
    /// Bill-of-quantities reference
    pub boq_number: Option<String>,
    /// System the part belongs to (e.g., "Escalator")
    pub belongs_to: Option<String>,
    pub category: Option<String>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
