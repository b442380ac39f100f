//! Issuance requisition endpoints.

use crate::api::auth::CurrentUser;
use crate::api::error::{ApiError, api_not_found};
use crate::api::types::ListResponse;
use crate::app::AppState;
use crate::core::issuance_requisition::{
    self, IssuanceRequisitionChanges, IssuanceRequisitionFilter, NewIssuanceRequisition,
    StatusCounts,
};
use crate::entities::issuance_requisition as issuance_requisition_entity;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

pub(crate) async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(filter): Query<IssuanceRequisitionFilter>,
) -> Result<Json<ListResponse<issuance_requisition_entity::Model>>, ApiError> {
    let items = issuance_requisition::list_issuance_requisitions(&*state.db, &filter).await?;
    Ok(Json(items.into()))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<NewIssuanceRequisition>,
) -> Result<impl IntoResponse, ApiError> {
    let created = issuance_requisition::create_issuance_requisition(&*state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<issuance_requisition_entity::Model>, ApiError> {
    issuance_requisition::get_issuance_requisition_by_id(&*state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| api_not_found(format!("issuance requisition {id} not found")))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<IssuanceRequisitionChanges>,
) -> Result<Json<issuance_requisition_entity::Model>, ApiError> {
    let updated = issuance_requisition::update_issuance_requisition(&*state.db, id, body).await?;
    Ok(Json(updated))
}

pub(crate) async fn counts(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<StatusCounts>, ApiError> {
    Ok(Json(issuance_requisition::status_counts(&*state.db).await?))
}
