//! Authentication and authorization logic.
//!
//! Provides password hashing, JWT management, refresh-token rotation, and
//! the session lifecycle (register / login / refresh / logout).

pub mod jwt;
pub mod password;
pub mod queries;
pub mod session;
pub mod tokens;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User with this e-mail already exists")]
    DuplicateEmail,

    #[error("User not found")]
    NotFound,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("No refresh token provided")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Refresh token has been superseded")]
    TokenMismatch,

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
