//! Notification business logic - In-app notices.

use crate::{
    core::required,
    entities::{Notification, notification},
    errors::{Error, Result},
    models::NotificationKind,
};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use serde_json::Value;

/// Default page size for [`get_recent_notifications`].
pub const DEFAULT_RECENT_LIMIT: u64 = 10;

/// Creates an unread notification.
pub async fn create_notification<C>(
    db: &C,
    kind: NotificationKind,
    title: &str,
    message: &str,
    data: Option<Value>,
) -> Result<notification::Model>
where
    C: ConnectionTrait,
{
    let title = required("title", title)?;
    let message = required("message", message)?;

    notification::ActiveModel {
        kind: Set(kind.as_str().to_string()),
        title: Set(title),
        message: Set(message),
        is_read: Set(false),
        data: Set(data),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Newest notifications first, at most `limit`.
pub async fn get_recent_notifications(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<notification::Model>> {
    Notification::find()
        .order_by_desc(notification::Column::CreatedAt)
        .order_by_desc(notification::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn mark_as_read(db: &DatabaseConnection, id: i64) -> Result<notification::Model> {
    let existing = Notification::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("notification", id))?;

    if existing.is_read {
        return Ok(existing);
    }

    let mut active: notification::ActiveModel = existing.into();
    active.is_read = Set(true);
    active.update(db).await.map_err(Into::into)
}
