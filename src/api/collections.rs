//! Collection document endpoints.

use crate::api::auth::CurrentUser;
use crate::api::error::ApiError;
use crate::api::types::{AppendResponse, CollectionResponse, ReplaceCollectionRequest};
use crate::app::AppState;
use crate::core::collections;
use crate::models::CollectionKey;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;

pub(crate) async fn get_collection(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(key): Path<String>,
) -> Result<Json<CollectionResponse>, ApiError> {
    let key: CollectionKey = key.parse()?;
    let items = collections::list_items(&*state.db, key).await?;
    Ok(Json(CollectionResponse { key, items }))
}

pub(crate) async fn replace_collection(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(key): Path<String>,
    Json(body): Json<ReplaceCollectionRequest>,
) -> Result<Json<CollectionResponse>, ApiError> {
    let key: CollectionKey = key.parse()?;
    let items = collections::replace_items(&*state.db, &state.hub, key, body.items).await?;
    Ok(Json(CollectionResponse { key, items }))
}

pub(crate) async fn append_item(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(key): Path<String>,
    Json(item): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let key: CollectionKey = key.parse()?;
    let index = collections::append_item(&*state.db, &state.hub, key, item).await?;
    Ok((StatusCode::CREATED, Json(AppendResponse { index })))
}

pub(crate) async fn remove_item(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path((key, index)): Path<(String, usize)>,
) -> Result<Json<Value>, ApiError> {
    let key: CollectionKey = key.parse()?;
    Ok(Json(collections::remove_item(&*state.db, &state.hub, key, index).await?))
}
