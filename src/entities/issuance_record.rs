//! Issuance record entity - Signed hand-over sheet for tools and items.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Issuance record database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "issuance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub requisition_id: Option<i64>,
    pub issuer_name: Option<String>,
    pub department: Option<String>,
    /// Date of issue
    pub date: Date,
    pub issuer_designation: Option<String>,
    pub issuer_contact: Option<String>,
    /// Signature image as a data URL
    pub issuer_signature: Option<String>,
    pub issuer_olt_no: Option<String>,
    /// JSON array of `{description, unit, qty, remarks}` lines
    pub tools: Json,
    /// Receiver block (name, department, signature, contact, ...)
    pub receiver: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
