//! Requisition business logic - Issue, return and consume workflow.
//!
//! A requisition is raised as `pending`, may be approved or rejected, and is
//! completed exactly once. Completion is what moves stock: it applies the
//! name-based adjustment from [`crate::core::quantity`] to the requested item.
//!
//! Status flow:
//!
//! ```text
//! pending ──approve──► approved ──complete──► completed
//!    │                    │
//!    └──────reject────────┴──► rejected
//! pending ──complete──► completed
//! ```

use crate::{
    core::{
        notification, optional,
        quantity::{self, AdjustRequest, Adjustment, ChangeContext},
        required,
        sync::SyncHub,
    },
    entities::{Requisition, requisition},
    errors::{Error, Result},
    models::{NotificationKind, Priority, RequisitionStatus, RequisitionType, StockCategory},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    Condition, QueryOrder, QuerySelect, Set, TransactionTrait, UpdateMany, prelude::*,
    sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Fields for a new requisition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewRequisition {
    /// Requester; filled in by the HTTP layer when left blank
    #[serde(default)]
    pub user_id: String,
    /// Stock category name, e.g. `"ppe"` or `"spare_parts"`
    pub item_type: String,
    pub item_name: String,
    pub quantity: f64,
    /// `"issue"`, `"return"` or `"consume"`
    pub requisition_type: String,
    pub reason: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub issued_to: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Filters for [`list_requisitions`]. Empty filter returns everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequisitionFilter {
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// Substring of reason, notes, department, location or item name
    pub q: Option<String>,
}

/// A completed requisition and the stock change it caused.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    pub requisition: requisition::Model,
    /// `None` when no item with the requested name exists
    pub adjustment: Option<Adjustment>,
}

struct ValidatedRequisition {
    category: StockCategory,
    kind: RequisitionType,
    priority: Priority,
    user_id: String,
    item_name: String,
    reason: String,
}

fn validate(new: &NewRequisition) -> Result<ValidatedRequisition> {
    if !new.quantity.is_finite() || new.quantity <= 0.0 {
        return Err(Error::InvalidQuantity {
            quantity: new.quantity,
        });
    }

    Ok(ValidatedRequisition {
        category: new.item_type.parse()?,
        kind: new.requisition_type.parse()?,
        priority: match new.priority.as_deref().map(str::trim) {
            None | Some("") => Priority::default(),
            Some(p) => p.parse()?,
        },
        user_id: required("user_id", &new.user_id)?,
        item_name: required("item_name", &new.item_name)?,
        reason: required("reason", &new.reason)?,
    })
}

/// Next `REQ-YYYYMMDD-NNN` reference for the day of `now`.
///
/// Follows the highest sequence issued today, so deleted requisitions never
/// cause a number to be handed out twice while a later one still exists.
/// Call inside the insert transaction.
async fn next_reference_number<C>(db: &C, now: DateTime<Utc>) -> Result<String>
where
    C: ConnectionTrait,
{
    let prefix = format!("REQ-{}-", now.format("%Y%m%d"));
    let today: Vec<String> = Requisition::find()
        .select_only()
        .column(requisition::Column::ReferenceNumber)
        .filter(requisition::Column::ReferenceNumber.starts_with(&prefix))
        .into_tuple()
        .all(db)
        .await?;
    Ok(super::next_sequence_number(&prefix, &today))
}

async fn insert_requisition<C>(
    db: &C,
    new: NewRequisition,
    valid: ValidatedRequisition,
) -> Result<requisition::Model>
where
    C: ConnectionTrait,
{
    let now = Utc::now();
    let reference_number = next_reference_number(db, now).await?;

    requisition::ActiveModel {
        reference_number: Set(reference_number),
        user_id: Set(valid.user_id),
        item_type: Set(valid.category.as_str().to_string()),
        item_name: Set(valid.item_name),
        quantity: Set(new.quantity),
        requisition_type: Set(valid.kind.as_str().to_string()),
        status: Set(RequisitionStatus::Pending.as_str().to_string()),
        priority: Set(valid.priority.as_str().to_string()),
        reason: Set(valid.reason),
        issued_to: Set(optional(new.issued_to)),
        department: Set(optional(new.department)),
        location: Set(optional(new.location)),
        notes: Set(optional(new.notes)),
        requested_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Raises a pending requisition and notifies.
///
/// # Errors
/// - [`Error::InvalidQuantity`] unless the quantity is a positive number
/// - [`Error::Validation`] for an unknown category, type or priority, or a
///   blank user, item name or reason
pub async fn create_requisition(
    db: &DatabaseConnection,
    new: NewRequisition,
) -> Result<requisition::Model> {
    let valid = validate(&new)?;
    let txn = db.begin().await?;
    let created = insert_requisition(&txn, new, valid).await?;
    notification::create_notification(
        &txn,
        NotificationKind::Requisition,
        "New requisition",
        &format!(
            "{} requested {} x {} ({})",
            created.user_id, created.quantity, created.item_name, created.requisition_type
        ),
        Some(json!({ "requisition_id": created.id, "reference_number": created.reference_number })),
    )
    .await?;
    txn.commit().await?;

    tracing::info!(
        id = created.id,
        reference = %created.reference_number,
        item = %created.item_name,
        "requisition created"
    );
    Ok(created)
}

pub async fn get_requisition_by_id<C>(db: &C, id: i64) -> Result<Option<requisition::Model>>
where
    C: ConnectionTrait,
{
    Requisition::find_by_id(id).one(db).await.map_err(Into::into)
}

async fn require_requisition<C>(db: &C, id: i64) -> Result<requisition::Model>
where
    C: ConnectionTrait,
{
    get_requisition_by_id(db, id)
        .await?
        .ok_or_else(|| Error::not_found("requisition", id))
}

/// Requisitions matching every set filter, newest first.
pub async fn list_requisitions(
    db: &DatabaseConnection,
    filter: &RequisitionFilter,
) -> Result<Vec<requisition::Model>> {
    let mut query = Requisition::find();

    if let Some(user_id) = &filter.user_id {
        query = query.filter(requisition::Column::UserId.eq(user_id.as_str()));
    }
    if let Some(status) = &filter.status {
        let status: RequisitionStatus = status.parse()?;
        query = query.filter(requisition::Column::Status.eq(status.as_str()));
    }
    if let Some(priority) = &filter.priority {
        let priority: Priority = priority.parse()?;
        query = query.filter(requisition::Column::Priority.eq(priority.as_str()));
    }
    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(requisition::Column::Reason.contains(q))
                .add(requisition::Column::Notes.contains(q))
                .add(requisition::Column::Department.contains(q))
                .add(requisition::Column::Location.contains(q))
                .add(requisition::Column::ItemName.contains(q)),
        );
    }

    query
        .order_by_desc(requisition::Column::RequestedAt)
        .order_by_desc(requisition::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn get_pending_requisitions(db: &DatabaseConnection) -> Result<Vec<requisition::Model>> {
    list_requisitions(
        db,
        &RequisitionFilter {
            status: Some(RequisitionStatus::Pending.as_str().to_string()),
            ..Default::default()
        },
    )
    .await
}

fn status_of(req: &requisition::Model) -> Result<RequisitionStatus> {
    req.status.parse()
}

/// Applies `update` only while the requisition is in one of `from`.
///
/// The status check and the write are one conditional statement, so a
/// concurrent completion cannot be overwritten.
async fn transition(
    db: &DatabaseConnection,
    id: i64,
    update: UpdateMany<Requisition>,
    from: &[RequisitionStatus],
    action: &str,
) -> Result<requisition::Model> {
    let result = update
        .filter(requisition::Column::Id.eq(id))
        .filter(requisition::Column::Status.is_in(from.iter().copied().map(RequisitionStatus::as_str)))
        .exec(db)
        .await?;

    let current = require_requisition(db, id).await?;
    if result.rows_affected == 0 {
        return Err(Error::InvalidState {
            message: format!("requisition {id} is {} and cannot be {action}", current.status),
        });
    }
    Ok(current)
}

/// Approves a pending requisition.
pub async fn approve_requisition(
    db: &DatabaseConnection,
    id: i64,
    approved_by: &str,
    notes: Option<String>,
) -> Result<requisition::Model> {
    let approved_by = required("approved_by", approved_by)?;
    let mut update = Requisition::update_many()
        .col_expr(
            requisition::Column::Status,
            Expr::value(RequisitionStatus::Approved.as_str()),
        )
        .col_expr(requisition::Column::ApprovedAt, Expr::value(Utc::now()))
        .col_expr(requisition::Column::ApprovedBy, Expr::value(approved_by));
    if let Some(notes) = optional(notes) {
        update = update.col_expr(requisition::Column::Notes, Expr::value(notes));
    }

    let updated = transition(db, id, update, &[RequisitionStatus::Pending], "approved").await?;
    tracing::info!(id, "requisition approved");
    Ok(updated)
}

/// Rejects a pending or approved requisition; the reason is kept in `notes`.
pub async fn reject_requisition(
    db: &DatabaseConnection,
    id: i64,
    rejected_by: &str,
    reason: &str,
) -> Result<requisition::Model> {
    let rejected_by = required("rejected_by", rejected_by)?;
    let reason = required("reason", reason)?;
    let update = Requisition::update_many()
        .col_expr(
            requisition::Column::Status,
            Expr::value(RequisitionStatus::Rejected.as_str()),
        )
        .col_expr(requisition::Column::ApprovedAt, Expr::value(Utc::now()))
        .col_expr(requisition::Column::ApprovedBy, Expr::value(rejected_by))
        .col_expr(requisition::Column::Notes, Expr::value(reason));

    let updated = transition(
        db,
        id,
        update,
        &[RequisitionStatus::Pending, RequisitionStatus::Approved],
        "rejected",
    )
    .await?;
    tracing::info!(id, "requisition rejected");
    Ok(updated)
}

/// Completes a requisition and applies its stock adjustment.
///
/// The status is claimed with a conditional update before stock is touched,
/// so a requisition completed twice concurrently adjusts stock once. If the
/// adjustment fails the previous status is restored.
///
/// # Errors
/// - [`Error::NotFound`] if the requisition does not exist
/// - [`Error::InvalidState`] unless it is pending or approved
pub async fn complete_requisition(
    db: &DatabaseConnection,
    hub: &SyncHub,
    id: i64,
    completed_by: &str,
) -> Result<Completion> {
    let existing = require_requisition(db, id).await?;
    let previous_status = status_of(&existing)?;

    let claimed = Requisition::update_many()
        .col_expr(
            requisition::Column::Status,
            Expr::value(RequisitionStatus::Completed.as_str()),
        )
        .col_expr(requisition::Column::CompletedAt, Expr::value(Utc::now()))
        .filter(requisition::Column::Id.eq(id))
        .filter(requisition::Column::Status.is_in([
            RequisitionStatus::Pending.as_str(),
            RequisitionStatus::Approved.as_str(),
        ]))
        .exec(db)
        .await?;
    if claimed.rows_affected == 0 {
        return Err(Error::InvalidState {
            message: format!("requisition {id} is {previous_status} and cannot be completed"),
        });
    }

    let request = AdjustRequest {
        category: existing.item_type.parse()?,
        item_name: existing.item_name.clone(),
        kind: existing.requisition_type.parse().ok(),
        quantity: existing.quantity,
        context: ChangeContext {
            user_id: completed_by.to_string(),
            reason: existing.reason.clone(),
            location: existing.location.clone(),
            department: existing.department.clone(),
            notes: Some(existing.reference_number.clone()),
        },
    };

    let adjustment = match quantity::adjust_item_quantity(db, hub, &request).await {
        Ok(adjustment) => adjustment,
        Err(e) => {
            tracing::error!(id, error = %e, "stock adjustment failed, restoring requisition status");
            let mut active: requisition::ActiveModel = existing.into();
            active.status = Set(previous_status.as_str().to_string());
            active.completed_at = Set(None);
            active.update(db).await?;
            return Err(e);
        }
    };

    if adjustment.is_none() {
        tracing::warn!(
            id,
            item = %existing.item_name,
            category = %existing.item_type,
            "requisition completed but no matching item was found"
        );
    }

    let requisition = require_requisition(db, id).await?;
    // Stock has already moved; a lost notification must not fail the call.
    if let Err(e) = notification::create_notification(
        db,
        NotificationKind::Requisition,
        "Requisition completed",
        &format!("{} completed", requisition.reference_number),
        Some(json!({
            "requisition_id": requisition.id,
            "new_quantity": adjustment.as_ref().map(|a| a.new_quantity),
        })),
    )
    .await
    {
        tracing::warn!(id, error = %e, "completion notification not recorded");
    }

    Ok(Completion {
        requisition,
        adjustment,
    })
}

/// Raises and immediately completes a requisition.
pub async fn record_transaction(
    db: &DatabaseConnection,
    hub: &SyncHub,
    new: NewRequisition,
) -> Result<Completion> {
    let valid = validate(&new)?;
    let txn = db.begin().await?;
    let created = insert_requisition(&txn, new, valid).await?;
    txn.commit().await?;
    let completed_by = created.user_id.clone();
    complete_requisition(db, hub, created.id, &completed_by).await
}

pub async fn delete_requisition(db: &DatabaseConnection, id: i64) -> Result<()> {
    let result = Requisition::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("requisition", id));
    }
    Ok(())
}
