//! Gate pass endpoints.

use crate::api::auth::CurrentUser;
use crate::api::error::{ApiError, api_not_found};
use crate::api::types::{GatePassDecisionRequest, ListResponse};
use crate::app::AppState;
use crate::core::gate_pass::{self, NewGatePass};
use crate::entities::gate_pass as gate_pass_entity;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

pub(crate) async fn list_gate_passes(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ListResponse<gate_pass_entity::Model>>, ApiError> {
    Ok(Json(gate_pass::list_gate_passes(&*state.db).await?.into()))
}

pub(crate) async fn create_gate_pass(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<NewGatePass>,
) -> Result<impl IntoResponse, ApiError> {
    let created = gate_pass::create_gate_pass(&*state.db, body, &current.user.display_name).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn get_gate_pass(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<gate_pass_entity::Model>, ApiError> {
    gate_pass::get_gate_pass_by_id(&*state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| api_not_found(format!("gate pass {id} not found")))
}

pub(crate) async fn decide(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<GatePassDecisionRequest>,
) -> Result<Json<gate_pass_entity::Model>, ApiError> {
    let decided =
        gate_pass::decide_gate_pass(&*state.db, id, body.decision, &current.user.display_name)
            .await?;
    Ok(Json(decided))
}

pub(crate) async fn deactivate(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<gate_pass_entity::Model>, ApiError> {
    Ok(Json(gate_pass::deactivate_gate_pass(&*state.db, id).await?))
}
