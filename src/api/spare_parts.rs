//! Spare part endpoints.

use crate::api::auth::CurrentUser;
use crate::api::error::{ApiError, api_not_found};
use crate::api::types::{ListResponse, SearchQuery, StockChangeRequest};
use crate::app::AppState;
use crate::core::spare_part::{self, NewSparePart, SparePartChanges};
use crate::entities::spare_part as spare_part_entity;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

type PartList = Json<ListResponse<spare_part_entity::Model>>;

pub(crate) async fn list_parts(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> Result<PartList, ApiError> {
    let parts = match (&query.category, &query.q) {
        (Some(category), _) => spare_part::get_spare_parts_by_category(&*state.db, category).await?,
        (None, Some(q)) => spare_part::search_spare_parts(&*state.db, q).await?,
        (None, None) => spare_part::get_all_spare_parts(&*state.db).await?,
    };
    Ok(Json(parts.into()))
}

pub(crate) async fn low_stock(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<PartList, ApiError> {
    Ok(Json(spare_part::get_low_stock_spare_parts(&*state.db).await?.into()))
}

pub(crate) async fn create_part(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<NewSparePart>,
) -> Result<impl IntoResponse, ApiError> {
    let part = spare_part::create_spare_part(&*state.db, &state.hub, body).await?;
    Ok((StatusCode::CREATED, Json(part)))
}

pub(crate) async fn get_part(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<spare_part_entity::Model>, ApiError> {
    spare_part::get_spare_part_by_id(&*state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| api_not_found(format!("spare part {id} not found")))
}

pub(crate) async fn update_part(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<SparePartChanges>,
) -> Result<Json<spare_part_entity::Model>, ApiError> {
    Ok(Json(spare_part::update_spare_part(&*state.db, &state.hub, id, body).await?))
}

pub(crate) async fn delete_part(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    spare_part::delete_spare_part(&*state.db, &state.hub, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn update_stock(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<StockChangeRequest>,
) -> Result<Json<spare_part_entity::Model>, ApiError> {
    let context = body.context(current.actor_id());
    let part = spare_part::update_stock(
        &*state.db,
        &state.hub,
        id,
        body.change,
        body.requisition_type,
        &context,
    )
    .await?;
    Ok(Json(part))
}
