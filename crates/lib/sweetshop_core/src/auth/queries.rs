//! Auth-related database queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::{User, UserAuthRow};

/// Fetch a user with credential material by (already normalized) email.
pub async fn find_user_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<UserAuthRow>, AuthError> {
    let row = sqlx::query_as::<_, UserAuthRow>(
        "SELECT id, name, email, is_admin, password_hash, refresh_token_hash, \
         refresh_token_expires_at \
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Fetch a user with credential material by id.
pub async fn find_user_by_id(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<UserAuthRow>, AuthError> {
    let row = sqlx::query_as::<_, UserAuthRow>(
        "SELECT id, name, email, is_admin, password_hash, refresh_token_hash, \
         refresh_token_expires_at \
         FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Fetch a user without credential material.
pub async fn get_user(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, User>(
        "SELECT id, name, email, is_admin FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Check whether an email is already registered.
pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, AuthError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// Count total users.
pub async fn user_count(pool: &PgPool) -> Result<i64, AuthError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Create a new user.
pub async fn create_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
    is_admin: bool,
) -> Result<User, AuthError> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password_hash, is_admin) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, name, email, is_admin",
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(is_admin)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

/// Store a user's current refresh token hash, replacing any previous one.
/// Overwriting is what invalidates older tokens.
pub async fn set_refresh_token(
    pool: &PgPool,
    user_id: Uuid,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), AuthError> {
    sqlx::query(
        "UPDATE users SET refresh_token_hash = $2, refresh_token_expires_at = $3, \
         updated_at = now() \
         WHERE id = $1",
    )
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Clear a user's stored refresh token (logout).
pub async fn clear_refresh_token(pool: &PgPool, user_id: Uuid) -> Result<(), AuthError> {
    sqlx::query(
        "UPDATE users SET refresh_token_hash = NULL, refresh_token_expires_at = NULL, \
         updated_at = now() \
         WHERE id = $1",
    )
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}
