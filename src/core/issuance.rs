//! Issuance business logic - Signed hand-over sheets for tools.

use crate::{
    core::{notification, optional},
    entities::{IssuanceRecord, issuance_record},
    errors::{Error, Result},
    models::{NotificationKind, Receiver},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// One line of an issuance sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolLine {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub qty: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Fields for a new issuance record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewIssuance {
    #[serde(default)]
    pub requisition_id: Option<i64>,
    #[serde(default)]
    pub issuer_name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    /// Defaults to today (UTC)
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub issuer_designation: Option<String>,
    #[serde(default)]
    pub issuer_contact: Option<String>,
    #[serde(default)]
    pub issuer_signature: Option<String>,
    #[serde(default)]
    pub issuer_olt_no: Option<String>,
    pub tools: Vec<ToolLine>,
    #[serde(default)]
    pub receiver: Option<Receiver>,
}

fn validate_tools(tools: &[ToolLine]) -> Result<()> {
    if tools.is_empty() {
        return Err(Error::validation("an issuance needs at least one tool line"));
    }
    for (i, line) in tools.iter().enumerate() {
        if line.description.trim().is_empty() {
            return Err(Error::validation(format!("tool line {i} has no description")));
        }
        if !line.qty.is_finite() || line.qty <= 0.0 {
            return Err(Error::InvalidQuantity { quantity: line.qty });
        }
    }
    Ok(())
}

/// Records an issuance sheet and notifies.
pub async fn create_issuance(
    db: &DatabaseConnection,
    new: NewIssuance,
) -> Result<issuance_record::Model> {
    validate_tools(&new.tools)?;

    let now = Utc::now();
    let tool_count = new.tools.len();
    let tools = serde_json::to_value(&new.tools)?;
    let receiver = new.receiver.map(serde_json::to_value).transpose()?;

    let txn = db.begin().await?;
    let created = issuance_record::ActiveModel {
        requisition_id: Set(new.requisition_id),
        issuer_name: Set(optional(new.issuer_name)),
        department: Set(optional(new.department)),
        date: Set(new.date.unwrap_or_else(|| now.date_naive())),
        issuer_designation: Set(optional(new.issuer_designation)),
        issuer_contact: Set(optional(new.issuer_contact)),
        issuer_signature: Set(optional(new.issuer_signature)),
        issuer_olt_no: Set(optional(new.issuer_olt_no)),
        tools: Set(tools),
        receiver: Set(receiver),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    notification::create_notification(
        &txn,
        NotificationKind::Issuance,
        "Tools issued",
        &format!(
            "{} tool line(s) issued by {}",
            tool_count,
            created.issuer_name.as_deref().unwrap_or("store")
        ),
        Some(json!({ "issuance_id": created.id })),
    )
    .await?;
    txn.commit().await?;

    tracing::info!(id = created.id, lines = tool_count, "issuance recorded");
    Ok(created)
}

pub async fn get_issuance_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<issuance_record::Model>> {
    IssuanceRecord::find_by_id(id).one(db).await.map_err(Into::into)
}

/// All issuance records, newest first.
pub async fn list_issuances(db: &DatabaseConnection) -> Result<Vec<issuance_record::Model>> {
    IssuanceRecord::find()
        .order_by_desc(issuance_record::Column::Date)
        .order_by_desc(issuance_record::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn line(description: &str, qty: f64) -> ToolLine {
        ToolLine {
            description: description.to_string(),
            unit: Some("pcs".to_string()),
            qty,
            remarks: None,
        }
    }

    #[test]
    fn test_validate_tools() {
        assert!(matches!(validate_tools(&[]), Err(Error::Validation { .. })));
        assert!(matches!(
            validate_tools(&[line(" ", 1.0)]),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            validate_tools(&[line("Crimper", 0.0)]),
            Err(Error::InvalidQuantity { .. })
        ));
        assert!(validate_tools(&[line("Crimper", 1.0), line("Stripper", 2.0)]).is_ok());
    }

    #[tokio::test]
    async fn test_create_and_get() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_issuance(
            &db,
            NewIssuance {
                issuer_name: Some("Store Keeper".to_string()),
                date: NaiveDate::from_ymd_opt(2025, 2, 14),
                tools: vec![line("Insulation Tester", 1.0)],
                receiver: Some(Receiver {
                    name: Some("Night shift".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(created.date, NaiveDate::from_ymd_opt(2025, 2, 14).unwrap());

        let fetched = get_issuance_by_id(&db, created.id).await?.unwrap();
        let tools: Vec<ToolLine> = serde_json::from_value(fetched.tools)?;
        assert_eq!(tools, vec![line("Insulation Tester", 1.0)]);
        assert!(get_issuance_by_id(&db, 404).await?.is_none());

        assert_eq!(list_issuances(&db).await?.len(), 1);
        let notices = notification::get_recent_notifications(&db, 1).await?;
        assert_eq!(notices[0].kind, "issuance");
        Ok(())
    }
}
