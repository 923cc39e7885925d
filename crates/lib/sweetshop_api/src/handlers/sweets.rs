//! Sweet catalog and purchase request handlers.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use sweetshop_core::auth::AuthError;
use sweetshop_core::models::sweet::{NewSweet, SweetFilter, SweetPatch};
use sweetshop_core::{inventory, purchase};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    AddStockRequest, CreateSweetRequest, PurchaseDto, PurchaseRequest, SearchQuery, SweetDto,
    UpdateSweetRequest,
};
use crate::response::ApiEnvelope;

/// `POST /api/v1/sweets/create` (admin) — add a sweet to the catalog.
pub async fn create_sweet_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateSweetRequest>,
) -> AppResult<(StatusCode, Json<ApiEnvelope<SweetDto>>)> {
    let sweet = inventory::create_sweet(
        &state.pool,
        NewSweet {
            name: body.name,
            description: body.description,
            category: body.category,
            price: body.price,
            stock: body.stock,
            image: body.image,
        },
    )
    .await?;
    Ok(ApiEnvelope::created(
        sweet.into(),
        "Sweet Created Successfully",
    ))
}

/// `GET /api/v1/sweets` — list the whole catalog.
pub async fn list_sweets_handler(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<ApiEnvelope<Vec<SweetDto>>>)> {
    let sweets = inventory::list_sweets(&state.pool).await?;
    let sweets: Vec<SweetDto> = sweets.into_iter().map(Into::into).collect();
    Ok(ApiEnvelope::ok(sweets, "Sweets fetched successfully"))
}

/// `GET /api/v1/sweets/search` — filtered catalog listing.
pub async fn search_sweets_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<(StatusCode, Json<ApiEnvelope<Vec<SweetDto>>>)> {
    let sweets = inventory::search(
        &state.pool,
        SweetFilter {
            name: query.name,
            category: query.category,
            min_price: query.min_price,
            max_price: query.max_price,
        },
    )
    .await?;
    let sweets: Vec<SweetDto> = sweets.into_iter().map(Into::into).collect();
    Ok(ApiEnvelope::ok(sweets, "Sweets fetched successfully"))
}

/// `PUT /api/v1/sweets/{id}` (admin) — partially update a sweet.
pub async fn update_sweet_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateSweetRequest>,
) -> AppResult<(StatusCode, Json<ApiEnvelope<SweetDto>>)> {
    let sweet = inventory::update_sweet(
        &state.pool,
        id,
        SweetPatch {
            name: body.name,
            description: body.description,
            category: body.category,
            price: body.price,
            stock: body.stock,
            image: body.image,
        },
    )
    .await?;
    Ok(ApiEnvelope::ok(sweet.into(), "Sweet updated successfully"))
}

/// `DELETE /api/v1/sweets/{id}` (admin) — hard-delete a sweet.
pub async fn delete_sweet_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<ApiEnvelope<()>>)> {
    inventory::delete_sweet(&state.pool, id).await?;
    Ok(ApiEnvelope::ok((), "Sweet deleted successfully"))
}

/// `POST /api/v1/sweets/{id}/addStock` (admin) — restock a sweet.
pub async fn add_stock_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AddStockRequest>,
) -> AppResult<(StatusCode, Json<ApiEnvelope<SweetDto>>)> {
    let sweet = inventory::add_stock(&state.pool, id, body.quantity).await?;
    Ok(ApiEnvelope::ok(sweet.into(), "Stock added successfully"))
}

/// `POST /api/v1/sweets/{id}/purchase` (authenticated) — buy a sweet.
pub async fn purchase_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<PurchaseRequest>,
) -> AppResult<(StatusCode, Json<ApiEnvelope<PurchaseDto>>)> {
    let buyer_id: Uuid = user.0.sub.parse().map_err(|_| AuthError::InvalidToken)?;
    let receipt = purchase::purchase(
        &state.pool,
        buyer_id,
        id,
        body.quantity,
        body.comment,
        body.unit_price,
    )
    .await?;
    Ok(ApiEnvelope::created(
        receipt.into(),
        "Sweet purchased successfully",
    ))
}
