//! Purchase ledger models.
//!
//! Purchases are an append-only ledger: rows are never mutated or deleted,
//! and they pin the unit price in effect at purchase time.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Ledger row. `sweet_id` goes `NULL` when the referenced sweet is later
/// hard-deleted; the row itself stays.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Purchase {
    pub id: Uuid,
    pub sweet_id: Option<Uuid>,
    pub buyer_id: Uuid,
    pub price: Decimal,
    pub quantity: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A completed purchase with the sweet's name resolved, as returned to the
/// buyer right after checkout.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseReceipt {
    pub purchase: Purchase,
    pub sweet_name: String,
}

/// One purchase-history entry. Sweet fields fall back to placeholders when
/// the sweet has been deleted since the purchase.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
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

/// A buyer's purchase history, newest first, with totals.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseHistory {
    pub purchases: Vec<HistoryEntry>,
    pub total_purchases: i64,
    pub total_spent: Decimal,
}
