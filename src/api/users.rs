//! User administration endpoints. All require the dev or admin role.

use crate::api::auth::AdminUser;
use crate::api::error::{ApiError, api_forbidden, api_not_found};
use crate::api::types::{ListResponse, UserQuery};
use crate::app::AppState;
use crate::core::user::{self, NewUser, UserChanges};
use crate::entities::user as user_entity;
use crate::models::UserRole;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

pub(crate) async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<UserQuery>,
) -> Result<Json<ListResponse<user_entity::Model>>, ApiError> {
    let mut users = match (&query.role, &query.q) {
        (Some(role), _) => user::get_users_by_role(&*state.db, role.parse::<UserRole>()?).await?,
        (None, Some(q)) => user::search_users(&*state.db, q).await?,
        (None, None) => user::list_users(&*state.db).await?,
    };
    if let Some(q) = query.q.as_deref().filter(|_| query.role.is_some()) {
        let q = q.trim().to_lowercase();
        users.retain(|u| {
            u.display_name.to_lowercase().contains(&q) || u.email.contains(&q)
        });
    }
    if let Some(active) = query.active {
        users.retain(|u| u.is_active == active);
    }
    Ok(Json(users.into()))
}

pub(crate) async fn create_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    let created = user::create_user(&*state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<user_entity::Model>, ApiError> {
    user::get_user_by_id(&*state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| api_not_found(format!("user {id} not found")))
}

pub(crate) async fn update_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(body): Json<UserChanges>,
) -> Result<Json<user_entity::Model>, ApiError> {
    Ok(Json(user::update_user(&*state.db, id, body).await?))
}

pub(crate) async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if admin.user.id == id {
        return Err(api_forbidden("you cannot delete your own account"));
    }
    user::delete_user(&*state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
