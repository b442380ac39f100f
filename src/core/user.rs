//! User business logic - Staff account administration.
//!
//! Emails are stored trimmed and lowercased so lookups and the uniqueness
//! check ignore case. Passwords are hashed by [`crate::core::auth`].

use crate::{
    core::{auth, optional, required},
    entities::{Session, User, session, user},
    errors::{Error, Result},
    models::UserRole,
};
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;

/// Fields for a new user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub role: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Accounts without a password cannot sign in until one is set
    #[serde(default)]
    pub password: Option<String>,
}

/// Partial update; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserChanges {
    pub display_name: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub employee_id: Option<String>,
    pub is_active: Option<bool>,
    pub email_verified: Option<bool>,
    pub password: Option<String>,
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(Error::validation(format!("`{email}` is not a valid email")));
    }
    Ok(email)
}

/// All users, by display name.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::DisplayName)
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn get_user_by_id<C>(db: &C, id: i64) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Looks a user up by email, ignoring case.
pub async fn get_user_by_email<C>(db: &C, email: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(Into::into)
}

pub async fn get_users_by_role(db: &DatabaseConnection, role: UserRole) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::Role.eq(role.as_str()))
        .order_by_asc(user::Column::DisplayName)
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn get_active_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::IsActive.eq(true))
        .order_by_asc(user::Column::DisplayName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Substring search over display name, email, department and employee id.
pub async fn search_users(db: &DatabaseConnection, term: &str) -> Result<Vec<user::Model>> {
    let term = term.trim();
    if term.is_empty() {
        return list_users(db).await;
    }

    User::find()
        .filter(
            Condition::any()
                .add(user::Column::DisplayName.contains(term))
                .add(user::Column::Email.contains(term))
                .add(user::Column::Department.contains(term))
                .add(user::Column::EmployeeId.contains(term)),
        )
        .order_by_asc(user::Column::DisplayName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates an active user.
///
/// # Errors
/// - [`Error::Validation`] for a malformed email, blank name, unknown role or
///   too-short password
/// - [`Error::Conflict`] if the email is already registered
pub async fn create_user<C>(db: &C, new: NewUser) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let email = normalize_email(&new.email)?;
    let display_name = required("display_name", &new.display_name)?;
    let role: UserRole = new.role.parse()?;
    let password_hash = new
        .password
        .as_deref()
        .map(auth::hash_password)
        .transpose()?;

    if get_user_by_email(db, &email).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("a user with email {email} already exists"),
        });
    }

    let now = chrono::Utc::now();
    let created = user::ActiveModel {
        email: Set(email),
        display_name: Set(display_name),
        role: Set(role.as_str().to_string()),
        department: Set(optional(new.department)),
        employee_id: Set(optional(new.employee_id)),
        password_hash: Set(password_hash),
        is_active: Set(true),
        email_verified: Set(false),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(id = created.id, email = %created.email, role = %created.role, "user created");
    Ok(created)
}

/// Applies a partial update. Deactivating a user ends their sessions.
pub async fn update_user(
    db: &DatabaseConnection,
    id: i64,
    changes: UserChanges,
) -> Result<user::Model> {
    let existing = get_user_by_id(db, id)
        .await?
        .ok_or_else(|| Error::not_found("user", id))?;

    let mut active: user::ActiveModel = existing.into();
    if let Some(name) = changes.display_name {
        active.display_name = Set(required("display_name", &name)?);
    }
    if let Some(role) = changes.role {
        let role: UserRole = role.parse()?;
        active.role = Set(role.as_str().to_string());
    }
    if changes.department.is_some() {
        active.department = Set(optional(changes.department));
    }
    if changes.employee_id.is_some() {
        active.employee_id = Set(optional(changes.employee_id));
    }
    if let Some(verified) = changes.email_verified {
        active.email_verified = Set(verified);
    }
    if let Some(password) = changes.password {
        active.password_hash = Set(Some(auth::hash_password(&password)?));
    }
    let deactivated = changes.is_active == Some(false);
    if let Some(is_active) = changes.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(chrono::Utc::now());

    let txn = db.begin().await?;
    let updated = active.update(&txn).await?;
    if deactivated {
        Session::delete_many()
            .filter(session::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
    }
    txn.commit().await?;
    Ok(updated)
}

/// Deletes a user and their sessions.
pub async fn delete_user(db: &DatabaseConnection, id: i64) -> Result<()> {
    let txn = db.begin().await?;
    Session::delete_many()
        .filter(session::Column::UserId.eq(id))
        .exec(&txn)
        .await?;
    let result = User::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("user", id));
    }
    txn.commit().await?;
    tracing::info!(id, "user deleted");
    Ok(())
}
