//! User profile and purchase-history handlers.

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use uuid::Uuid;

use sweetshop_core::auth::{AuthError, queries};
use sweetshop_core::purchase;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{PurchaseHistoryResponse, UserDto};
use crate::response::ApiEnvelope;

/// `GET /api/v1/users/current` — the authenticated user's profile.
pub async fn current_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<(StatusCode, Json<ApiEnvelope<UserDto>>)> {
    let user_id: Uuid = user.0.sub.parse().map_err(|_| AuthError::InvalidToken)?;
    let user = queries::get_user(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(ApiEnvelope::ok(
        user.into(),
        "Current user retrieved successfully",
    ))
}

/// `GET /api/v1/users/purchase-history` — the authenticated user's
/// purchases, newest first, with totals.
pub async fn purchase_history_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<(StatusCode, Json<ApiEnvelope<PurchaseHistoryResponse>>)> {
    let user_id: Uuid = user.0.sub.parse().map_err(|_| AuthError::InvalidToken)?;
    let history = purchase::purchase_history(&state.pool, user_id).await?;
    Ok(ApiEnvelope::ok(
        history.into(),
        "User purchase history retrieved successfully",
    ))
}
