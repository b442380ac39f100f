//! Gate pass business logic - Authorizing items to leave the premises.

use crate::{
    core::{notification, optional},
    entities::{GatePass, gate_pass},
    errors::{Error, Result},
    models::{ApprovalStatus, NotificationKind, Receiver},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use serde_json::json;

/// Fields for a new gate pass. Everything except the items is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewGatePass {
    /// Generated when absent
    #[serde(default)]
    pub pass_number: Option<String>,
    #[serde(default)]
    pub requisition_id: Option<i64>,
    #[serde(default)]
    pub requester_name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub items_description: Option<String>,
    #[serde(default)]
    pub quantity_summary: Option<String>,
    /// Free-form date, as entered on the paper form
    #[serde(default)]
    pub expected_return_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub receiver: Option<Receiver>,
}

/// `GP-YYYYMMDD-<epoch millis>`.
#[must_use]
pub fn generate_pass_number(now: DateTime<Utc>) -> String {
    format!("GP-{}-{}", now.format("%Y%m%d"), now.timestamp_millis())
}

/// Creates an active, pending gate pass and notifies.
///
/// # Errors
/// Returns [`Error::Conflict`] if the pass number is already taken.
pub async fn create_gate_pass(
    db: &DatabaseConnection,
    new: NewGatePass,
    created_by: &str,
) -> Result<gate_pass::Model> {
    let now = Utc::now();
    let pass_number = optional(new.pass_number).unwrap_or_else(|| generate_pass_number(now));
    let receiver = new.receiver.map(serde_json::to_value).transpose()?;

    let txn = db.begin().await?;

    let taken = GatePass::find()
        .filter(gate_pass::Column::PassNumber.eq(pass_number.as_str()))
        .one(&txn)
        .await?;
    if taken.is_some() {
        return Err(Error::Conflict {
            message: format!("gate pass {pass_number} already exists"),
        });
    }

    let created = gate_pass::ActiveModel {
        pass_number: Set(pass_number),
        requisition_id: Set(new.requisition_id),
        requester_name: Set(optional(new.requester_name)),
        department: Set(optional(new.department)),
        destination: Set(optional(new.destination)),
        purpose: Set(optional(new.purpose)),
        items_description: Set(optional(new.items_description)),
        quantity_summary: Set(optional(new.quantity_summary)),
        expected_return_date: Set(optional(new.expected_return_date)),
        approval_status: Set(ApprovalStatus::Pending.as_str().to_string()),
        approved_by: Set(None),
        approval_date: Set(None),
        is_active: Set(true),
        notes: Set(optional(new.notes)),
        receiver: Set(receiver),
        created_by: Set(optional(Some(created_by.to_string()))),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    notification::create_notification(
        &txn,
        NotificationKind::GatePass,
        "Gate pass created",
        &format!("{} awaits approval", created.pass_number),
        Some(json!({ "gate_pass_id": created.id, "pass_number": created.pass_number })),
    )
    .await?;
    txn.commit().await?;

    tracing::info!(id = created.id, pass = %created.pass_number, "gate pass created");
    Ok(created)
}

/// Looks up a gate pass; a missing one is `None`, not an error.
pub async fn get_gate_pass_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<gate_pass::Model>> {
    GatePass::find_by_id(id).one(db).await.map_err(Into::into)
}

/// All gate passes, newest first.
pub async fn list_gate_passes(db: &DatabaseConnection) -> Result<Vec<gate_pass::Model>> {
    GatePass::find()
        .order_by_desc(gate_pass::Column::CreatedAt)
        .order_by_desc(gate_pass::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Approves or rejects a pending gate pass.
///
/// # Errors
/// - [`Error::Validation`] if `decision` is `pending` or `decided_by` is blank
/// - [`Error::InvalidState`] if the pass was already decided
pub async fn decide_gate_pass(
    db: &DatabaseConnection,
    id: i64,
    decision: ApprovalStatus,
    decided_by: &str,
) -> Result<gate_pass::Model> {
    if decision == ApprovalStatus::Pending {
        return Err(Error::validation("decision must be approved or rejected"));
    }
    let decided_by = super::required("decided_by", decided_by)?;

    let existing = get_gate_pass_by_id(db, id)
        .await?
        .ok_or_else(|| Error::not_found("gate pass", id))?;
    if existing.approval_status != ApprovalStatus::Pending.as_str() {
        return Err(Error::InvalidState {
            message: format!(
                "gate pass {} is already {}",
                existing.pass_number, existing.approval_status
            ),
        });
    }

    let now = Utc::now();
    let mut active: gate_pass::ActiveModel = existing.into();
    active.approval_status = Set(decision.as_str().to_string());
    active.approved_by = Set(Some(decided_by));
    active.approval_date = Set(Some(now));
    active.updated_at = Set(now);
    let updated = active.update(db).await?;

    tracing::info!(id, decision = %decision, "gate pass decided");
    Ok(updated)
}

/// Marks a gate pass as no longer in use.
pub async fn deactivate_gate_pass(db: &DatabaseConnection, id: i64) -> Result<gate_pass::Model> {
    let existing = get_gate_pass_by_id(db, id)
        .await?
        .ok_or_else(|| Error::not_found("gate pass", id))?;

    let mut active: gate_pass::ActiveModel = existing.into();
    active.is_active = Set(false);
    active.updated_at = Set(Utc::now());
    active.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use chrono::TimeZone;

    #[test]
    fn test_generate_pass_number_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 10, 30, 0).unwrap();
        assert_eq!(
            generate_pass_number(at),
            format!("GP-20250307-{}", at.timestamp_millis())
        );
    }

    #[tokio::test]
    async fn test_create_defaults() -> Result<()> {
        let db = setup_test_db().await?;
        let pass = create_gate_pass(
            &db,
            NewGatePass {
                destination: Some("Depot 2".to_string()),
                receiver: Some(Receiver {
                    name: Some("R. Perera".to_string()),
                    olt_no: Some("OLT-17".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            "store-1",
        )
        .await?;

        assert!(pass.pass_number.starts_with("GP-"));
        assert_eq!(pass.approval_status, "pending");
        assert!(pass.is_active);
        assert_eq!(pass.created_by.as_deref(), Some("store-1"));
        let receiver: Receiver = serde_json::from_value(pass.receiver.clone().unwrap())?;
        assert_eq!(receiver.olt_no.as_deref(), Some("OLT-17"));

        let fetched = get_gate_pass_by_id(&db, pass.id).await?.unwrap();
        assert_eq!(fetched.pass_number, pass.pass_number);
        assert!(get_gate_pass_by_id(&db, 999).await?.is_none());

        let notices = notification::get_recent_notifications(&db, 10).await?;
        assert_eq!(notices[0].kind, "gate_pass");
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_pass_number_conflicts() -> Result<()> {
        let db = setup_test_db().await?;
        let new = NewGatePass {
            pass_number: Some("GP-MANUAL-1".to_string()),
            ..Default::default()
        };
        create_gate_pass(&db, new.clone(), "store-1").await?;
        let result = create_gate_pass(&db, new, "store-1").await;
        assert!(matches!(result, Err(Error::Conflict { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_decide_and_deactivate() -> Result<()> {
        let db = setup_test_db().await?;
        let pass = create_gate_pass(&db, NewGatePass::default(), "store-1").await?;

        let result = decide_gate_pass(&db, pass.id, ApprovalStatus::Pending, "mgr").await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let approved = decide_gate_pass(&db, pass.id, ApprovalStatus::Approved, "mgr").await?;
        assert_eq!(approved.approval_status, "approved");
        assert_eq!(approved.approved_by.as_deref(), Some("mgr"));
        assert!(approved.approval_date.is_some());

        let result = decide_gate_pass(&db, pass.id, ApprovalStatus::Rejected, "mgr").await;
        assert!(matches!(result, Err(Error::InvalidState { .. })));

        let inactive = deactivate_gate_pass(&db, pass.id).await?;
        assert!(!inactive.is_active);

        let listed = list_gate_passes(&db).await?;
        assert_eq!(listed.len(), 1);
        Ok(())
    }
}
