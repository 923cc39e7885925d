//! Authentication domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain user, safe for responses (no credential material).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

/// User row with credential material, for internal auth flows only.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserAuthRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub password_hash: String,
    pub refresh_token_hash: Option<String>,
    pub refresh_token_expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl UserAuthRow {
    /// Strip credential material.
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            is_admin: self.is_admin,
        }
    }
}

/// JWT claims embedded in access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — user ID (standard JWT `sub` claim).
    pub sub: String,
    /// User email.
    pub email: String,
    /// Whether the user may perform admin-gated catalog mutations.
    pub is_admin: bool,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

/// A user plus a freshly issued token pair.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}
