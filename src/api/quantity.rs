//! Name-based quantity adjustment and the ledger.

use crate::api::auth::CurrentUser;
use crate::api::error::ApiError;
use crate::api::types::{AdjustQuantityRequest, AdjustQuantityResponse, ListResponse};
use crate::app::AppState;
use crate::core::quantity::{self, AdjustRequest, ChangeContext, LedgerFilter};
use crate::entities::quantity_update;
use axum::Json;
use axum::extract::{Query, State};

pub(crate) async fn adjust(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<AdjustQuantityRequest>,
) -> Result<Json<AdjustQuantityResponse>, ApiError> {
    let request = AdjustRequest {
        category: body.category.parse()?,
        item_name: body.item_name,
        kind: body.requisition_type.parse().ok(),
        quantity: body.quantity,
        context: ChangeContext {
            user_id: current.actor_id(),
            reason: body.reason.unwrap_or_else(|| "manual adjustment".to_string()),
            location: body.location,
            department: body.department,
            notes: body.notes,
        },
    };

    let adjustment = quantity::adjust_item_quantity(&*state.db, &state.hub, &request).await?;
    Ok(Json(AdjustQuantityResponse {
        adjusted: adjustment.is_some(),
        adjustment,
    }))
}

pub(crate) async fn list_updates(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(filter): Query<LedgerFilter>,
) -> Result<Json<ListResponse<quantity_update::Model>>, ApiError> {
    Ok(Json(quantity::query_updates(&*state.db, &filter).await?.into()))
}
