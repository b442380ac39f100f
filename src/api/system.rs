//! Health, sync revision and dashboard endpoints.

use crate::api::error::{ApiError, api_internal};
use crate::api::types::{HealthStatus, SyncStatus};
use crate::app::AppState;
use crate::api::auth::CurrentUser;
use crate::core::stats::{self, DashboardCounts};
use axum::Json;
use axum::extract::State;

/// Liveness plus a database ping. Needs no sign-in.
pub(crate) async fn system_health(
    State(state): State<AppState>,
) -> Result<Json<HealthStatus>, ApiError> {
    if let Err(err) = state.db.ping().await {
        tracing::error!(error = %err, "database ping failed");
        return Err(api_internal("storage unavailable"));
    }
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
    }))
}

/// Current change revision, for clients that poll instead of subscribing.
pub(crate) async fn sync_status(State(state): State<AppState>, _user: CurrentUser) -> Json<SyncStatus> {
    Json(SyncStatus {
        revision: state.hub.revision(),
    })
}

pub(crate) async fn dashboard(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<DashboardCounts>, ApiError> {
    Ok(Json(stats::dashboard_counts(&*state.db).await?))
}
