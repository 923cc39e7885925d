//! Catalog domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Image shown for sweets without an uploaded picture, and for purchase
/// history entries whose sweet has since been deleted.
pub const PLACEHOLDER_IMAGE: &str =
    "https://tse2.mm.bing.net/th/id/OIP.b2VM6VpFKtDuv1PUp3aj3AAAAA?rs=1&pid=ImgDetMain&o=7&rm=3";

/// A catalog item. `stock` is only ever mutated through the inventory
/// service's atomic operations and never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sweet {
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

/// Fields for creating a sweet. `stock` defaults to 0 and `image` to the
/// catalog placeholder when absent.
#[derive(Debug, Clone)]
pub struct NewSweet {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub stock: Option<i32>,
    pub image: Option<String>,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct SweetPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub image: Option<String>,
}

/// Catalog search filter. Name matches as a case-insensitive substring,
/// category matches exactly, prices are an inclusive range.
#[derive(Debug, Clone, Default)]
pub struct SweetFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}
