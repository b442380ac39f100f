//! Unified error type for the inventory service.
//!
//! Business logic in [`crate::core`] returns [`Result`]; the HTTP layer maps
//! each variant to a status code in [`crate::api::error`].

use thiserror::Error;

/// Every failure the service can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Caller-supplied input failed validation.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description
        message: String,
    },

    /// A quantity was not a finite number or not allowed in this context.
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: f64,
    },

    /// A strict stock update would take the quantity below zero.
    #[error("Insufficient stock: have {current}, change of {requested} not possible")]
    InsufficientStock {
        /// Quantity on hand
        current: i64,
        /// Requested signed change
        requested: i64,
    },

    /// A stock item (inventory item, spare part) does not exist.
    #[error("Item not found: {name}")]
    ItemNotFound {
        /// Name or id used for the lookup
        name: String,
    },

    /// A generic record (requisition, gate pass, user, ...) does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record
        entity: &'static str,
        /// Id used for the lookup
        id: String,
    },

    /// A uniqueness rule was violated.
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable description
        message: String,
    },

    /// The record is not in a state that allows the operation.
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Human-readable description
        message: String,
    },

    /// Missing, unknown or expired credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable description
        message: String,
    },

    /// Authenticated but not allowed.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Human-readable description
        message: String,
    },

    /// Password hashing failed.
    #[error("Password hashing error: {message}")]
    PasswordHash {
        /// Human-readable description
        message: String,
    },

    /// Database error from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
