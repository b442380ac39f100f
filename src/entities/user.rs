//! User entity - Staff accounts that can sign in and act on the inventory.
//!
//! The `role` column holds one of the `UserRole` names (`dev`, `admin`,
//! `manager`, ...). Password hashes are argon2 PHC strings and never leave
//! the service.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login email, stored lowercased and trimmed
    #[sea_orm(unique)]
    pub email: String,
    /// Name shown in the UI
    pub display_name: String,
    /// Role name (see `UserRole`)
    pub role: String,
    /// Department the user belongs to (e.g., "E&M SYSTEMS")
    pub department: Option<String>,
    /// Employee number
    pub employee_id: Option<String>,
    /// argon2 hash; `None` for accounts that cannot sign in with a password
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Inactive users cannot sign in
    pub is_active: bool,
    /// Whether the email address was confirmed
    pub email_verified: bool,
    /// Last successful sign-in
    pub last_login: Option<DateTimeUtc>,
    /// When the user was created
    pub created_at: DateTimeUtc,
    /// When the user was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many sessions
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
