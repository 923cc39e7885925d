//! Refresh token generation, parsing, and hashing.
//!
//! A refresh token is `<user-id>.<64 random alphanumerics>`. The embedded id
//! locates the user on refresh; only the SHA-256 hash of the full token is
//! stored, one active token per user, overwritten on every issue.

use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::AuthError;

/// Refresh token lifetime: 30 days.
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

/// Generate a fresh refresh token for a user.
pub fn generate_refresh_token(user_id: Uuid) -> String {
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    format!("{user_id}.{secret}")
}

/// Extract the user id from a refresh token. Fails with `InvalidToken` on
/// anything that does not look like `<uuid>.<secret>`.
pub fn parse_refresh_token(token: &str) -> Result<Uuid, AuthError> {
    let (id, secret) = token.split_once('.').ok_or(AuthError::InvalidToken)?;
    if secret.is_empty() {
        return Err(AuthError::InvalidToken);
    }
    id.parse().map_err(|_| AuthError::InvalidToken)
}

/// SHA-256 hash a refresh token for storage.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
