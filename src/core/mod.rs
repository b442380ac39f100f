//! Core business logic, independent of the HTTP layer.
//!
//! Functions take a SeaORM connection (and a [`sync::SyncHub`] when they
//! change stock) and return [`crate::errors::Result`].

pub mod auth;
pub mod collections;
pub mod gate_pass;
pub mod inventory;
pub mod issuance;
pub mod issuance_requisition;
pub mod notification;
pub mod quantity;
pub mod requisition;
pub mod seed;
pub mod spare_part;
pub mod stats;
pub mod sync;
pub mod user;

/// Folded form of a name for comparisons that ignore case and surrounding
/// whitespace.
///
/// Folding happens in Rust rather than with SQL `lower()`, which only folds
/// ASCII under `SQLite`.
pub(crate) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// `<prefix>NNN` following the highest sequence among `existing`.
///
/// References with a different prefix or a non-numeric tail are ignored.
pub(crate) fn next_sequence_number(prefix: &str, existing: &[String]) -> String {
    let last = existing
        .iter()
        .filter_map(|reference| reference.strip_prefix(prefix)?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{prefix}{:03}", last.saturating_add(1))
}

/// Trims a required text field, rejecting blank values.
pub(crate) fn required(field: &str, value: &str) -> crate::errors::Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::errors::Error::validation(format!(
            "{field} cannot be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field; blank becomes `None`.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
