use crate::api::auth::CurrentUser;
use crate::api::error::{ApiError, api_not_found};
use crate::api::types::ListResponse;
use crate::app::AppState;
use crate::core::issuance::{self, NewIssuance};
use crate::entities::issuance_record;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

pub(crate) async fn list_issuances(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ListResponse<issuance_record::Model>>, ApiError> {
    Ok(Json(issuance::list_issuances(&*state.db).await?.into()))
}

pub(crate) async fn create_issuance(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<NewIssuance>,
) -> Result<impl IntoResponse, ApiError> {
    let created = issuance::create_issuance(&*state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn get_issuance(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<issuance_record::Model>, ApiError> {
    issuance::get_issuance_by_id(&*state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| api_not_found(format!("issuance {id} not found")))
}
