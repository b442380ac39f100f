//! Issuance requisitions - Multi-line requests for items to be issued.
//!
//! Unlike a [`crate::core::requisition`], an issuance requisition carries a
//! list of item lines and never moves stock itself; the store fulfils it with
//! an issuance sheet. Numbers follow `IR-YYYYMMDD-NNN`.

use crate::{
    core::{notification, optional, required},
    entities::{IssuanceRequisition, issuance_requisition},
    errors::{Error, Result},
    models::{NotificationKind, Priority, RequisitionStatus},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    Condition, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

const DEFAULT_UNIT: &str = "pcs";

/// One requested item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_code: Option<String>,
    pub item_description: String,
    #[serde(default)]
    pub unit: String,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Fields for a new issuance requisition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewIssuanceRequisition {
    /// Generated when absent
    #[serde(default)]
    pub requisition_number: Option<String>,
    pub department: String,
    /// Defaults to today (UTC)
    #[serde(default)]
    pub request_date: Option<NaiveDate>,
    #[serde(default)]
    pub required_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<String>,
    pub items: Vec<RequestedItem>,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuanceRequisitionChanges {
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub required_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<RequestedItem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuanceRequisitionFilter {
    pub status: Option<String>,
    /// Substring of the number or department
    pub q: Option<String>,
}

/// Number of issuance requisitions in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub completed: u64,
}

/// Trims every line, defaults blank units and rejects unusable lines.
fn normalize_items(items: Vec<RequestedItem>) -> Result<Vec<RequestedItem>> {
    if items.is_empty() {
        return Err(Error::validation(
            "an issuance requisition needs at least one item",
        ));
    }

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.quantity.is_finite() || item.quantity <= 0.0 {
                return Err(Error::InvalidQuantity {
                    quantity: item.quantity,
                });
            }
            let item_description = required(&format!("item {i} description"), &item.item_description)?;
            let unit = optional(Some(item.unit)).unwrap_or_else(|| DEFAULT_UNIT.to_string());
            Ok(RequestedItem {
                item_code: optional(item.item_code),
                item_description,
                unit,
                quantity: item.quantity,
                remarks: optional(item.remarks),
            })
        })
        .collect()
}

fn parse_priority(priority: Option<&str>) -> Result<Option<Priority>> {
    match priority.map(str::trim) {
        None | Some("") => Ok(None),
        Some(p) => p.parse().map(Some),
    }
}

async fn next_requisition_number<C>(db: &C, now: DateTime<Utc>) -> Result<String>
where
    C: ConnectionTrait,
{
    let prefix = format!("IR-{}-", now.format("%Y%m%d"));
    let today: Vec<String> = IssuanceRequisition::find()
        .select_only()
        .column(issuance_requisition::Column::RequisitionNumber)
        .filter(issuance_requisition::Column::RequisitionNumber.starts_with(&prefix))
        .into_tuple()
        .all(db)
        .await?;
    Ok(super::next_sequence_number(&prefix, &today))
}

/// Raises a pending issuance requisition and notifies.
///
/// # Errors
/// - [`Error::Validation`] for a blank department, no items, a blank item
///   description or an unknown priority
/// - [`Error::InvalidQuantity`] for a line whose quantity is not positive
/// - [`Error::Conflict`] if a supplied number is already taken
pub async fn create_issuance_requisition(
    db: &DatabaseConnection,
    new: NewIssuanceRequisition,
) -> Result<issuance_requisition::Model> {
    let department = required("department", &new.department)?;
    let priority = parse_priority(new.priority.as_deref())?.unwrap_or_default();
    let items = normalize_items(new.items)?;
    let line_count = items.len();
    let items = serde_json::to_value(items)?;
    let now = Utc::now();

    let txn = db.begin().await?;
    let requisition_number = match optional(new.requisition_number) {
        Some(number) => {
            let taken = IssuanceRequisition::find()
                .filter(issuance_requisition::Column::RequisitionNumber.eq(number.as_str()))
                .one(&txn)
                .await?;
            if taken.is_some() {
                return Err(Error::Conflict {
                    message: format!("issuance requisition {number} already exists"),
                });
            }
            number
        }
        None => next_requisition_number(&txn, now).await?,
    };

    let created = issuance_requisition::ActiveModel {
        requisition_number: Set(requisition_number),
        department: Set(department),
        request_date: Set(new.request_date.unwrap_or_else(|| now.date_naive())),
        required_date: Set(new.required_date),
        priority: Set(priority.as_str().to_string()),
        status: Set(RequisitionStatus::Pending.as_str().to_string()),
        items: Set(items),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    notification::create_notification(
        &txn,
        NotificationKind::Requisition,
        "New issuance requisition",
        &format!(
            "{} requested {} item line(s) ({})",
            created.department, line_count, created.requisition_number
        ),
        Some(json!({ "issuance_requisition_id": created.id })),
    )
    .await?;
    txn.commit().await?;

    tracing::info!(
        id = created.id,
        number = %created.requisition_number,
        lines = line_count,
        "issuance requisition created"
    );
    Ok(created)
}

pub async fn get_issuance_requisition_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<issuance_requisition::Model>> {
    IssuanceRequisition::find_by_id(id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Issuance requisitions matching the filter, newest first.
pub async fn list_issuance_requisitions(
    db: &DatabaseConnection,
    filter: &IssuanceRequisitionFilter,
) -> Result<Vec<issuance_requisition::Model>> {
    let mut query = IssuanceRequisition::find();

    if let Some(status) = &filter.status {
        let status: RequisitionStatus = status.parse()?;
        query = query.filter(issuance_requisition::Column::Status.eq(status.as_str()));
    }
    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(issuance_requisition::Column::RequisitionNumber.contains(q))
                .add(issuance_requisition::Column::Department.contains(q)),
        );
    }

    query
        .order_by_desc(issuance_requisition::Column::RequestDate)
        .order_by_desc(issuance_requisition::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update.
///
/// Rejected and completed requisitions are final. The status check is part of
/// the update statement itself.
///
/// # Errors
/// - [`Error::NotFound`] if the requisition does not exist
/// - [`Error::InvalidState`] if it is already rejected or completed
/// - [`Error::Validation`] / [`Error::InvalidQuantity`] for bad fields
pub async fn update_issuance_requisition(
    db: &DatabaseConnection,
    id: i64,
    changes: IssuanceRequisitionChanges,
) -> Result<issuance_requisition::Model> {
    let mut update = IssuanceRequisition::update_many()
        .col_expr(issuance_requisition::Column::UpdatedAt, Expr::value(Utc::now()));

    if let Some(department) = changes.department {
        let department = required("department", &department)?;
        update = update.col_expr(issuance_requisition::Column::Department, Expr::value(department));
    }
    if let Some(date) = changes.required_date {
        update = update.col_expr(issuance_requisition::Column::RequiredDate, Expr::value(date));
    }
    if let Some(priority) = parse_priority(changes.priority.as_deref())? {
        update = update.col_expr(
            issuance_requisition::Column::Priority,
            Expr::value(priority.as_str()),
        );
    }
    if let Some(status) = &changes.status {
        let status: RequisitionStatus = status.parse()?;
        update = update.col_expr(issuance_requisition::Column::Status, Expr::value(status.as_str()));
    }
    if let Some(items) = changes.items {
        let items = serde_json::to_value(normalize_items(items)?)?;
        update = update.col_expr(issuance_requisition::Column::Items, Expr::value(items));
    }

    let result = update
        .filter(issuance_requisition::Column::Id.eq(id))
        .filter(issuance_requisition::Column::Status.is_in([
            RequisitionStatus::Pending.as_str(),
            RequisitionStatus::Approved.as_str(),
        ]))
        .exec(db)
        .await?;

    let current = get_issuance_requisition_by_id(db, id)
        .await?
        .ok_or_else(|| Error::not_found("issuance requisition", id))?;
    if result.rows_affected == 0 {
        return Err(Error::InvalidState {
            message: format!(
                "issuance requisition {} is {} and can no longer change",
                current.requisition_number, current.status
            ),
        });
    }

    tracing::info!(id, status = %current.status, "issuance requisition updated");
    Ok(current)
}

/// Tally of issuance requisitions per status.
pub async fn status_counts(db: &DatabaseConnection) -> Result<StatusCounts> {
    let statuses: Vec<String> = IssuanceRequisition::find()
        .select_only()
        .column(issuance_requisition::Column::Status)
        .into_tuple()
        .all(db)
        .await?;

    let mut counts = StatusCounts::default();
    for status in statuses {
        match status.parse::<RequisitionStatus>() {
            Ok(RequisitionStatus::Pending) => counts.pending += 1,
            Ok(RequisitionStatus::Approved) => counts.approved += 1,
            Ok(RequisitionStatus::Rejected) => counts.rejected += 1,
            Ok(RequisitionStatus::Completed) => counts.completed += 1,
            Err(_) => tracing::warn!(status = %status, "unknown issuance requisition status"),
        }
    }
    Ok(counts)
}
