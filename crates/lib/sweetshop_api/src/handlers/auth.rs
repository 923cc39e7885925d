//! Authentication request handlers.

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;

use sweetshop_core::auth::{AuthError, session};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{LoginRequest, RefreshRequest, RegisterRequest, TokenResponse};
use crate::response::ApiEnvelope;

/// `POST /api/v1/users/register` — create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiEnvelope<TokenResponse>>)> {
    let session = session::register(
        &state.pool,
        &body.name,
        &body.email,
        &body.password,
        state.config.jwt_secret.as_bytes(),
    )
    .await?;
    Ok(ApiEnvelope::created(
        session.into(),
        "User Registered Successfully",
    ))
}

/// `POST /api/v1/users/login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<(StatusCode, Json<ApiEnvelope<TokenResponse>>)> {
    let session = session::login(
        &state.pool,
        &body.email,
        &body.password,
        state.config.jwt_secret.as_bytes(),
    )
    .await?;
    Ok(ApiEnvelope::ok(session.into(), "User logged in successfully"))
}

/// `POST /api/v1/users/refresh` — exchange a refresh token for a new pair.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<(StatusCode, Json<ApiEnvelope<TokenResponse>>)> {
    let incoming = body.refresh_token.ok_or(AuthError::MissingToken)?;
    let session = session::refresh(
        &state.pool,
        &incoming,
        state.config.jwt_secret.as_bytes(),
    )
    .await?;
    Ok(ApiEnvelope::ok(
        session.into(),
        "Refresh token generated successfully",
    ))
}

/// `POST /api/v1/users/logout` — drop the stored refresh token.
/// Requires authentication.
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<(StatusCode, Json<ApiEnvelope<()>>)> {
    let user_id = user
        .0
        .sub
        .parse()
        .map_err(|_| AuthError::InvalidToken)?;
    session::logout(&state.pool, user_id).await?;
    Ok(ApiEnvelope::ok((), "User logged out successfully"))
}
