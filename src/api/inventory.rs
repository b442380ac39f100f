//! Inventory item endpoints.

use crate::api::auth::CurrentUser;
use crate::api::error::{ApiError, api_not_found};
use crate::api::types::{ListResponse, SearchQuery, StockChangeRequest};
use crate::app::AppState;
use crate::core::inventory::{self, InventoryItemChanges, LowStockItem, NewInventoryItem};
use crate::entities::inventory_item;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

pub(crate) async fn list_items(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ListResponse<inventory_item::Model>>, ApiError> {
    let items = match (&query.category, &query.q) {
        (Some(category), _) => inventory::get_items_by_category(&*state.db, category).await?,
        (None, Some(q)) => inventory::search_items(&*state.db, q).await?,
        (None, None) => inventory::get_all_items(&*state.db).await?,
    };
    Ok(Json(items.into()))
}

pub(crate) async fn low_stock(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ListResponse<LowStockItem>>, ApiError> {
    let items = inventory::get_low_stock_items(&*state.db, &state.config.stock_thresholds).await?;
    Ok(Json(items.into()))
}

pub(crate) async fn create_item(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<NewInventoryItem>,
) -> Result<impl IntoResponse, ApiError> {
    let item = inventory::create_item(&*state.db, &state.hub, body).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub(crate) async fn get_item(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<inventory_item::Model>, ApiError> {
    inventory::get_item_by_id(&*state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| api_not_found(format!("inventory item {id} not found")))
}

pub(crate) async fn update_item(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<InventoryItemChanges>,
) -> Result<Json<inventory_item::Model>, ApiError> {
    Ok(Json(inventory::update_item(&*state.db, &state.hub, id, body).await?))
}

pub(crate) async fn delete_item(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    inventory::delete_item(&*state.db, &state.hub, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn update_stock(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<StockChangeRequest>,
) -> Result<Json<inventory_item::Model>, ApiError> {
    let context = body.context(current.actor_id());
    let item = inventory::update_stock(
        &*state.db,
        &state.hub,
        id,
        body.change,
        body.requisition_type,
        &context,
    )
    .await?;
    Ok(Json(item))
}
