//! Requisition endpoints.

use crate::api::auth::CurrentUser;
use crate::api::error::{ApiError, api_not_found};
use crate::api::types::{ApproveRequest, ListResponse, RejectRequest};
use crate::app::AppState;
use crate::core::requisition::{self, Completion, NewRequisition, RequisitionFilter};
use crate::entities::requisition as requisition_entity;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Fills in the caller as the requester when the body names nobody.
fn with_requester(mut body: NewRequisition, current: &CurrentUser) -> NewRequisition {
    if body.user_id.trim().is_empty() {
        body.user_id = current.actor_id();
    }
    body
}

pub(crate) async fn list_requisitions(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(filter): Query<RequisitionFilter>,
) -> Result<Json<ListResponse<requisition_entity::Model>>, ApiError> {
    Ok(Json(requisition::list_requisitions(&*state.db, &filter).await?.into()))
}

pub(crate) async fn create_requisition(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<NewRequisition>,
) -> Result<impl IntoResponse, ApiError> {
    let created = requisition::create_requisition(&*state.db, with_requester(body, &current)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Raise-and-complete in one call.
pub(crate) async fn record_transaction(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<NewRequisition>,
) -> Result<impl IntoResponse, ApiError> {
    let completion =
        requisition::record_transaction(&*state.db, &state.hub, with_requester(body, &current)).await?;
    Ok((StatusCode::CREATED, Json(completion)))
}

pub(crate) async fn get_requisition(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<requisition_entity::Model>, ApiError> {
    requisition::get_requisition_by_id(&*state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| api_not_found(format!("requisition {id} not found")))
}

pub(crate) async fn delete_requisition(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    requisition::delete_requisition(&*state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn approve(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    body: Option<Json<ApproveRequest>>,
) -> Result<Json<requisition_entity::Model>, ApiError> {
    let notes = body.and_then(|Json(b)| b.notes);
    let approved =
        requisition::approve_requisition(&*state.db, id, &current.user.display_name, notes).await?;
    Ok(Json(approved))
}

pub(crate) async fn reject(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<RejectRequest>,
) -> Result<Json<requisition_entity::Model>, ApiError> {
    let rejected =
        requisition::reject_requisition(&*state.db, id, &current.user.display_name, &body.reason)
            .await?;
    Ok(Json(rejected))
}

pub(crate) async fn complete(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Completion>, ApiError> {
    let completion =
        requisition::complete_requisition(&*state.db, &state.hub, id, &current.actor_id()).await?;
    Ok(Json(completion))
}
