//! Session lifecycle: register, login, refresh, logout.
//!
//! A session is a pair of credentials: a short-lived JWT access token and a
//! long-lived refresh token. Exactly one refresh token is valid per user at
//! any time; issuing a new one (login, register, refresh) invalidates the
//! previous one by overwriting its stored hash.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{AuthError, jwt, password, queries, tokens};
use crate::models::auth::{AuthSession, User};

/// Normalize an email for storage and lookup. Applied uniformly to
/// registration, duplicate checks, and login.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Issue a fresh token pair for a user and persist the refresh token hash.
async fn issue_session(
    pool: &PgPool,
    user: User,
    jwt_secret: &[u8],
) -> Result<AuthSession, AuthError> {
    let access_token =
        jwt::generate_access_token(user.id, &user.email, user.is_admin, jwt_secret)?;
    let refresh_token = tokens::generate_refresh_token(user.id);
    let token_hash = tokens::hash_refresh_token(&refresh_token);

    let expires_at = Utc::now() + Duration::days(tokens::REFRESH_TOKEN_EXPIRY_DAYS);
    queries::set_refresh_token(pool, user.id, &token_hash, expires_at).await?;

    Ok(AuthSession {
        user,
        access_token,
        refresh_token,
        expires_in: jwt::ACCESS_TOKEN_EXPIRY_SECS,
    })
}

/// Register a new user account. The first registered user becomes admin.
pub async fn register(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
    jwt_secret: &[u8],
) -> Result<AuthSession, AuthError> {
    if name.trim().is_empty() || email.trim().is_empty() || password.trim().is_empty() {
        return Err(AuthError::Validation("All fields are required".into()));
    }

    let email = normalize_email(email);

    if queries::email_exists(pool, &email).await? {
        return Err(AuthError::DuplicateEmail);
    }

    let is_first_user = queries::user_count(pool).await? == 0;
    let pw_hash = password::hash_password(password)?;

    let user = queries::create_user(pool, name.trim(), &email, &pw_hash, is_first_user).await?;
    if is_first_user {
        info!(email = %email, "first registered user granted admin");
    }

    issue_session(pool, user, jwt_secret).await
}

/// Authenticate with email + password.
pub async fn login(
    pool: &PgPool,
    email: &str,
    password: &str,
    jwt_secret: &[u8],
) -> Result<AuthSession, AuthError> {
    let email = normalize_email(email);

    let row = queries::find_user_by_email(pool, &email)
        .await?
        .ok_or(AuthError::NotFound)?;

    if !password::verify_password(password, &row.password_hash)? {
        return Err(AuthError::InvalidPassword);
    }

    issue_session(pool, row.into_user(), jwt_secret).await
}

/// Exchange a refresh token for a new token pair (single-use rotation).
///
/// The presented token must hash to exactly the stored value for its user.
/// Anything older (rotated away, or superseded by a later login) fails
/// `TokenMismatch`.
pub async fn refresh(
    pool: &PgPool,
    incoming: &str,
    jwt_secret: &[u8],
) -> Result<AuthSession, AuthError> {
    if incoming.trim().is_empty() {
        return Err(AuthError::MissingToken);
    }

    let user_id = tokens::parse_refresh_token(incoming)?;

    let row = queries::find_user_by_id(pool, user_id)
        .await?
        .ok_or(AuthError::NotFound)?;

    let stored_hash = row.refresh_token_hash.as_deref().ok_or(AuthError::TokenMismatch)?;
    if tokens::hash_refresh_token(incoming) != stored_hash {
        return Err(AuthError::TokenMismatch);
    }

    match row.refresh_token_expires_at {
        Some(expires_at) if expires_at > Utc::now() => {}
        _ => return Err(AuthError::InvalidToken),
    }

    issue_session(pool, row.into_user(), jwt_secret).await
}

/// Log out: drop the stored refresh token so the session cannot continue.
pub async fn logout(pool: &PgPool, user_id: Uuid) -> Result<(), AuthError> {
    queries::clear_refresh_token(pool, user_id).await
}
