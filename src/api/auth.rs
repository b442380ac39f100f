//! Sign-in endpoints and the bearer-token extractors.
//!
//! Handlers that need a signed-in caller take [`CurrentUser`]; user
//! administration takes [`AdminUser`], which also checks the role.

use crate::api::error::{ApiError, api_forbidden, api_unauthorized};
use crate::api::types::LoginRequest;
use crate::app::AppState;
use crate::core::auth;
use crate::entities::user;
use crate::models::UserRole;
use axum::Json;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?;
    let value = value.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
}

/// The authenticated caller and the token they presented.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: user::Model,
    pub token: String,
}

impl CurrentUser {
    /// Id as stored in `user_id` columns of requisitions and the ledger.
    #[must_use]
    pub fn actor_id(&self) -> String {
        self.user.id.to_string()
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers)
            .ok_or_else(|| api_unauthorized("missing bearer token"))?
            .to_string();
        let user = auth::authenticate(&*state.db, &token).await?;
        Ok(Self { user, token })
    }
}

/// A caller allowed to manage user accounts.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        let allowed = current
            .user
            .role
            .parse::<UserRole>()
            .is_ok_and(UserRole::can_manage_users);
        if !allowed {
            return Err(api_forbidden("user administration requires the dev or admin role"));
        }
        Ok(Self(current))
    }
}

pub(crate) async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<auth::LoginSession>, ApiError> {
    let session = auth::login(
        &*state.db,
        &body.email,
        &body.password,
        state.config.server.session_ttl_hours,
    )
    .await?;
    Ok(Json(session))
}

pub(crate) async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<StatusCode, ApiError> {
    auth::logout(&*state.db, &current.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn me(current: CurrentUser) -> Json<user::Model> {
    Json(current.user)
}
