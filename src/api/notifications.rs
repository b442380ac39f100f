//! Notification feed endpoints.

use crate::api::auth::CurrentUser;
use crate::api::error::ApiError;
use crate::api::types::{LimitQuery, ListResponse, NotificationCreateRequest};
use crate::app::AppState;
use crate::core::notification::{self, DEFAULT_RECENT_LIMIT};
use crate::entities::notification as notification_entity;
use crate::models::NotificationKind;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Upper bound on `?limit`.
const MAX_LIMIT: u64 = 200;

pub(crate) async fn recent(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ListResponse<notification_entity::Model>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, MAX_LIMIT);
    Ok(Json(notification::get_recent_notifications(&*state.db, limit).await?.into()))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<NotificationCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let kind: NotificationKind = body.kind.parse()?;
    let created =
        notification::create_notification(&*state.db, kind, &body.title, &body.message, body.data)
            .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn mark_read(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<notification_entity::Model>, ApiError> {
    Ok(Json(notification::mark_as_read(&*state.db, id).await?))
}
