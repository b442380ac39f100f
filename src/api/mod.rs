//! HTTP handlers, grouped by resource.
//!
//! Handlers stay thin: they extract the caller and the body, call into
//! [`crate::core`], and let [`error::ApiError`] map failures to status codes.

pub mod auth;
pub mod collections;
pub mod error;
pub mod gate_passes;
pub mod inventory;
pub mod issuance_requisitions;
pub mod issuances;
pub mod notifications;
pub mod quantity;
pub mod requisitions;
pub mod spare_parts;
pub mod system;
pub mod types;
pub mod users;
