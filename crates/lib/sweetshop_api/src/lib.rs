//! # sweetshop_api
//!
//! HTTP API library for Sweetshop.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;

use axum::Router;
use axum::routing::{get, post, put};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{auth, sweets, users};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// API configuration.
    pub config: ApiConfig,
}

/// Run embedded database migrations.
///
/// Delegates to `sweetshop_core::migrate::migrate()` which owns the
/// migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sweetshop_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/api/v1/users/register", post(auth::register_handler))
        .route("/api/v1/users/login", post(auth::login_handler))
        .route("/api/v1/users/refresh", post(auth::refresh_handler))
        .route("/api/v1/sweets", get(sweets::list_sweets_handler))
        .route("/api/v1/sweets/search", get(sweets::search_sweets_handler));

    // Protected routes (require a valid access token)
    let protected = Router::new()
        .route("/api/v1/sweets/{id}/purchase", post(sweets::purchase_handler))
        .route("/api/v1/users/current", get(users::current_user_handler))
        .route(
            "/api/v1/users/purchase-history",
            get(users::purchase_history_handler),
        )
        .route("/api/v1/users/logout", post(auth::logout_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // Admin routes (require auth + the admin flag). Layers run outermost
    // first, so require_auth must be added after require_admin.
    let admin = Router::new()
        .route("/api/v1/sweets/create", post(sweets::create_sweet_handler))
        .route(
            "/api/v1/sweets/{id}",
            put(sweets::update_sweet_handler).delete(sweets::delete_sweet_handler),
        )
        .route("/api/v1/sweets/{id}/addStock", post(sweets::add_stock_handler))
        .layer(axum::middleware::from_fn(middleware::auth::require_admin))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(admin)
        .layer(cors)
        .with_state(state)
}
