//! Dataset entity - One JSON document per item collection.
//!
//! Collections (tools, PPE, stationery, ...) have no fixed schema. Each is
//! stored as a single JSON array under its collection key and rewritten as a
//! whole on every change.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Dataset database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "datasets")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Collection key (e.g., `"toolsItems"`)
    #[sea_orm(unique)]
    pub key: String,
    /// JSON array of loosely typed items
    pub items: Json,
    /// When the collection was last written
    pub updated_at: DateTimeUtc,
}

/// `Dataset` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
