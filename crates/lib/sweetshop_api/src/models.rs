//! API request and response models.
//!
//! Explicit serde DTOs (camelCase on the wire), decoded at the HTTP
//! boundary before anything reaches the core services. Distinct from the
//! internal domain models in `sweetshop_core::models`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sweetshop_core::models::auth::{AuthSession, User};
use sweetshop_core::models::purchase::{HistoryEntry, PurchaseHistory, PurchaseReceipt};
use sweetshop_core::models::sweet::Sweet;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub user: UserDto,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<AuthSession> for TokenResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.user.into(),
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            expires_in: session.expires_in,
            token_type: "Bearer".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sweets
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSweetRequest {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub stock: Option<i32>,
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSweetRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStockRequest {
    pub quantity: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweetDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub stock: i32,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Sweet> for SweetDto {
    fn from(sweet: Sweet) -> Self {
        Self {
            id: sweet.id,
            name: sweet.name,
            description: sweet.description,
            category: sweet.category,
            price: sweet.price,
            stock: sweet.stock,
            image: sweet.image,
            created_at: sweet.created_at,
            updated_at: sweet.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Purchases
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub quantity: i32,
    pub comment: Option<String>,
    /// Optional unit-price override; ignored unless positive.
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDto {
    pub id: Uuid,
    pub sweet_id: Option<Uuid>,
    pub sweet_name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PurchaseReceipt> for PurchaseDto {
    fn from(receipt: PurchaseReceipt) -> Self {
        Self {
            id: receipt.purchase.id,
            sweet_id: receipt.purchase.sweet_id,
            sweet_name: receipt.sweet_name,
            price: receipt.purchase.price,
            quantity: receipt.purchase.quantity,
            comment: receipt.purchase.comment,
            created_at: receipt.purchase.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryDto {
    pub id: Uuid,
    pub sweet_id: Option<Uuid>,
    pub sweet_name: String,
    pub sweet_category: String,
    pub sweet_image: String,
    pub price: Decimal,
    pub quantity: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<HistoryEntry> for HistoryEntryDto {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            sweet_id: entry.sweet_id,
            sweet_name: entry.sweet_name,
            sweet_category: entry.sweet_category,
            sweet_image: entry.sweet_image,
            price: entry.price,
            quantity: entry.quantity,
            comment: entry.comment,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseHistoryResponse {
    pub purchases: Vec<HistoryEntryDto>,
    pub total_purchases: i64,
    pub total_spent: Decimal,
}

impl From<PurchaseHistory> for PurchaseHistoryResponse {
    fn from(history: PurchaseHistory) -> Self {
        Self {
            purchases: history.purchases.into_iter().map(Into::into).collect(),
            total_purchases: history.total_purchases,
            total_spent: history.total_spent,
        }
    }
}
