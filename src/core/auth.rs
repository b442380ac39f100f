//! Authentication - Password hashing, sign-in sessions and the bootstrap user.
//!
//! Passwords are stored as argon2 PHC strings. A successful sign-in creates a
//! session row holding a random bearer token; the token is valid until its
//! `expires_at` or until it is revoked.

use crate::{
    config::users::DevUserConfig,
    core::user::{self, NewUser},
    entities::{Session, User, session, user as user_entity},
    errors::{Error, Result},
};
use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::{OsRng, RngCore},
    },
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{Set, prelude::*};
use serde::Serialize;

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 6;

const TOKEN_BYTES: usize = 32;

/// Longest session a configuration may ask for.
const MAX_SESSION_HOURS: i64 = 24 * 365;

/// A signed-in session as returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: user_entity::Model,
}

/// Hashes a password with a fresh salt.
///
/// # Errors
/// Returns a validation error for passwords shorter than
/// [`MIN_PASSWORD_LEN`], or [`Error::PasswordHash`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash {
            message: e.to_string(),
        })
}

/// Checks a password against a stored hash. Malformed hashes never match.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn invalid_credentials() -> Error {
    Error::Unauthorized {
        message: "invalid email or password".to_string(),
    }
}

/// Signs a user in and opens a session lasting `ttl_hours`.
///
/// Unknown emails, wrong passwords and accounts without a password all fail
/// the same way so callers cannot tell which accounts exist.
///
/// # Errors
/// - [`Error::Unauthorized`] for bad credentials
/// - [`Error::Forbidden`] if the account is deactivated
pub async fn login(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    ttl_hours: i64,
) -> Result<LoginSession> {
    let Some(account) = user::get_user_by_email(db, email).await? else {
        tracing::info!(email = %email.trim(), "sign-in for unknown email");
        return Err(invalid_credentials());
    };

    let matches = account
        .password_hash
        .as_deref()
        .is_some_and(|hash| verify_password(password, hash));
    if !matches {
        tracing::info!(user_id = account.id, "sign-in with wrong password");
        return Err(invalid_credentials());
    }
    if !account.is_active {
        return Err(Error::Forbidden {
            message: "account is deactivated".to_string(),
        });
    }

    let now = Utc::now();
    let expires_at = now + Duration::hours(ttl_hours.clamp(1, MAX_SESSION_HOURS));
    let token = generate_token();
    session::ActiveModel {
        token: Set(token.clone()),
        user_id: Set(account.id),
        created_at: Set(now),
        expires_at: Set(expires_at),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let mut active: user_entity::ActiveModel = account.into();
    active.last_login = Set(Some(now));
    let account = active.update(db).await?;

    tracing::info!(user_id = account.id, "user signed in");
    Ok(LoginSession {
        token,
        expires_at,
        user: account,
    })
}

/// Resolves a bearer token to its user.
///
/// Expired sessions are deleted when seen.
///
/// # Errors
/// Returns [`Error::Unauthorized`] for unknown or expired tokens and for
/// deactivated users.
pub async fn authenticate(db: &DatabaseConnection, token: &str) -> Result<user_entity::Model> {
    let unauthorized = |message: &str| Error::Unauthorized {
        message: message.to_string(),
    };

    let Some((found, account)) = Session::find()
        .filter(session::Column::Token.eq(token))
        .find_also_related(User)
        .one(db)
        .await?
    else {
        return Err(unauthorized("unknown session"));
    };

    if found.expires_at <= Utc::now() {
        Session::delete_by_id(found.id).exec(db).await?;
        return Err(unauthorized("session expired"));
    }

    match account {
        Some(account) if account.is_active => Ok(account),
        _ => Err(unauthorized("account is not active")),
    }
}

/// Revokes a session. Unknown tokens are ignored.
pub async fn logout(db: &DatabaseConnection, token: &str) -> Result<()> {
    Session::delete_many()
        .filter(session::Column::Token.eq(token))
        .exec(db)
        .await?;
    Ok(())
}

/// Deletes every expired session and returns how many were removed.
pub async fn purge_expired_sessions(db: &DatabaseConnection) -> Result<u64> {
    let result = Session::delete_many()
        .filter(session::Column::ExpiresAt.lte(Utc::now()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Makes sure the configured bootstrap account exists.
///
/// An existing account with that email is left untouched.
pub async fn ensure_dev_user(
    db: &DatabaseConnection,
    config: &DevUserConfig,
) -> Result<user_entity::Model> {
    if let Some(existing) = user::get_user_by_email(db, &config.email).await? {
        tracing::debug!(email = %existing.email, "development user already exists");
        return Ok(existing);
    }

    let created = user::create_user(
        db,
        NewUser {
            email: config.email.clone(),
            display_name: config.display_name.clone(),
            role: config.role.clone(),
            department: Some(config.department.clone()),
            employee_id: None,
            password: Some(config.password.clone()),
        },
    )
    .await?;

    let mut active: user_entity::ActiveModel = created.into();
    active.email_verified = Set(true);
    let created = active.update(db).await?;

    tracing::info!(email = %created.email, role = %created.role, "development user created");
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not-a-hash"));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(hash_password("abc"), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_tokens_are_random_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_login_authenticate_logout() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "tech@example.com", "technician").await?;

        let session = login(&db, "TECH@example.com", TEST_PASSWORD, 12).await?;
        assert_eq!(session.user.id, user.id);
        assert!(session.user.last_login.is_some());

        let me = authenticate(&db, &session.token).await?;
        assert_eq!(me.email, "tech@example.com");

        logout(&db, &session.token).await?;
        let result = authenticate(&db, &session.token).await;
        assert!(matches!(result, Err(Error::Unauthorized { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_bad_credentials() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "tech@example.com", "technician").await?;

        let result = login(&db, "tech@example.com", "not-the-password", 12).await;
        assert!(matches!(result, Err(Error::Unauthorized { .. })));
        let result = login(&db, "ghost@example.com", TEST_PASSWORD, 12).await;
        assert!(matches!(result, Err(Error::Unauthorized { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_sign_in() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_user(&db, "tech@example.com", "technician").await?;
        let session = login(&db, "tech@example.com", TEST_PASSWORD, 12).await?;

        user::update_user(
            &db,
            account.id,
            user::UserChanges {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;

        let result = login(&db, "tech@example.com", TEST_PASSWORD, 12).await;
        assert!(matches!(result, Err(Error::Forbidden { .. })));
        let result = authenticate(&db, &session.token).await;
        assert!(matches!(result, Err(Error::Unauthorized { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected_and_removed() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_user(&db, "tech@example.com", "technician").await?;
        let past = Utc::now() - Duration::hours(1);
        session::ActiveModel {
            token: Set("stale".to_string()),
            user_id: Set(account.id),
            created_at: Set(past - Duration::hours(12)),
            expires_at: Set(past),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let result = authenticate(&db, "stale").await;
        assert!(matches!(result, Err(Error::Unauthorized { .. })));
        assert_eq!(Session::find().all(&db).await?.len(), 0);
        assert_eq!(purge_expired_sessions(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_dev_user_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let config = DevUserConfig {
            email: "Dev@Example.com".to_string(),
            password: "dev-password".to_string(),
            display_name: "Developer".to_string(),
            department: "E&M SYSTEMS".to_string(),
            role: "dev".to_string(),
        };

        let first = ensure_dev_user(&db, &config).await?;
        let second = ensure_dev_user(&db, &config).await?;
        assert_eq!(first.id, second.id);
        assert_eq!(first.role, "dev");
        assert!(first.email_verified);

        let session = login(&db, "dev@example.com", "dev-password", 1).await?;
        assert_eq!(session.user.id, first.id);
        Ok(())
    }
}
