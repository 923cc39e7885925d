//! Application error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use sweetshop_core::auth::AuthError;
use sweetshop_core::inventory::InventoryError;
use sweetshop_core::purchase::PurchaseError;

use crate::response::ApiEnvelope;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    OutOfStock(String),

    #[error("User with this e-mail already exists")]
    DuplicateEmail,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::OutOfStock(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::InvalidPassword | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Internal details go to the log, never to the client.
            AppError::Internal(detail) => {
                error!(detail = %detail, "internal server error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        ApiEnvelope::failure(status, &message).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".into()),
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<InventoryError> for AppError {
    fn from(e: InventoryError) -> Self {
        match e {
            InventoryError::NotFound => AppError::NotFound("Sweet not found".into()),
            InventoryError::OutOfStock { .. } => AppError::OutOfStock(e.to_string()),
            InventoryError::InvalidQuantity(_) => AppError::Validation(e.to_string()),
            InventoryError::Validation(msg) => AppError::Validation(msg),
            InventoryError::Db(e) => AppError::from(e),
        }
    }
}

impl From<PurchaseError> for AppError {
    fn from(e: PurchaseError) -> Self {
        match e {
            PurchaseError::Inventory(e) => AppError::from(e),
            PurchaseError::Db(e) => AppError::from(e),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => AppError::Validation(msg),
            AuthError::DuplicateEmail => AppError::DuplicateEmail,
            AuthError::NotFound => AppError::NotFound("User not found".into()),
            AuthError::InvalidPassword => AppError::InvalidPassword,
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::TokenMismatch => {
                AppError::Unauthorized(e.to_string())
            }
            AuthError::Db(e) => AppError::from(e),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
