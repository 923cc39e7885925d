//! Purchase workflow — order creation composed with stock reservation.
//!
//! The workflow is reserve-then-record: stock is reserved first, then the
//! ledger row is inserted. If the insert fails the reservation is
//! compensated (stock restored) before the error propagates, so no quantity
//! is ever silently lost.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::inventory::{self, InventoryError};
use crate::models::purchase::{HistoryEntry, Purchase, PurchaseHistory, PurchaseReceipt};
use crate::models::sweet::PLACEHOLDER_IMAGE;
use crate::uuid::uuidv7;

/// Attempts to restore a leaked reservation before giving up.
const COMPENSATION_RETRIES: u32 = 3;

/// Name shown for history entries whose sweet has been deleted.
const UNAVAILABLE_NAME: &str = "Product Unavailable";

/// Purchase workflow errors.
#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Buy `quantity` units of a sweet.
///
/// The unit price is pinned at this moment: the override if supplied and
/// positive, otherwise the sweet's current price. Later price changes never
/// touch existing ledger rows. No ledger row is created when the
/// reservation fails, and a failed insert rolls the reservation back.
pub async fn purchase(
    pool: &PgPool,
    buyer_id: Uuid,
    sweet_id: Uuid,
    quantity: i32,
    comment: Option<String>,
    unit_price_override: Option<Decimal>,
) -> Result<PurchaseReceipt, PurchaseError> {
    if quantity <= 0 {
        return Err(InventoryError::InvalidQuantity(quantity).into());
    }

    let sweet = inventory::get_sweet(pool, sweet_id)
        .await?
        .ok_or(InventoryError::NotFound)?;

    let unit_price = match unit_price_override {
        Some(price) if price > Decimal::ZERO => price,
        _ => sweet.price,
    };

    inventory::reserve_stock(pool, sweet_id, quantity).await?;

    let inserted = sqlx::query_as::<_, Purchase>(
        r#"
        INSERT INTO purchases (id, sweet_id, buyer_id, price, quantity, comment)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, sweet_id, buyer_id, price, quantity, comment, created_at
        "#,
    )
    .bind(uuidv7())
    .bind(sweet_id)
    .bind(buyer_id)
    .bind(unit_price)
    .bind(quantity)
    .bind(comment.as_deref())
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(purchase) => Ok(PurchaseReceipt {
            purchase,
            sweet_name: sweet.name,
        }),
        Err(e) => {
            compensate_reservation(pool, sweet_id, quantity).await;
            Err(e.into())
        }
    }
}

/// Restore a reserved quantity after a failed ledger insert. Retries on
/// transient storage errors; exhaustion is logged, never swallowed silently.
async fn compensate_reservation(pool: &PgPool, sweet_id: Uuid, quantity: i32) {
    for attempt in 1..=COMPENSATION_RETRIES {
        match inventory::add_stock(pool, sweet_id, quantity).await {
            Ok(_) => return,
            // The sweet was deleted concurrently; there is no stock row
            // left to restore.
            Err(InventoryError::NotFound) => return,
            Err(e) => {
                warn!(%sweet_id, quantity, attempt, error = %e, "stock compensation failed");
            }
        }
    }
    error!(
        %sweet_id,
        quantity, "stock compensation exhausted retries; stock is undercounted"
    );
}

/// A buyer's purchase history, newest first, with totals. Entries whose
/// sweet has since been deleted resolve to a placeholder.
pub async fn purchase_history(
    pool: &PgPool,
    buyer_id: Uuid,
) -> Result<PurchaseHistory, PurchaseError> {
    let rows = sqlx::query_as::<_, HistoryRow>(
        r#"
        SELECT p.id, p.sweet_id, p.price, p.quantity, p.comment, p.created_at,
               s.name AS sweet_name, s.category AS sweet_category, s.image AS sweet_image
        FROM purchases p
        LEFT JOIN sweets s ON s.id = p.sweet_id
        WHERE p.buyer_id = $1
        ORDER BY p.created_at DESC
        "#,
    )
    .bind(buyer_id)
    .fetch_all(pool)
    .await?;

    let purchases: Vec<HistoryEntry> = rows.into_iter().map(HistoryRow::into_entry).collect();

    let total_purchases = purchases.len() as i64;
    let total_spent = purchases
        .iter()
        .map(|p| p.price * Decimal::from(p.quantity))
        .sum();

    Ok(PurchaseHistory {
        purchases,
        total_purchases,
        total_spent,
    })
}

/// Joined row; sweet columns are NULL for dangling references.
#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    id: Uuid,
    sweet_id: Option<Uuid>,
    price: Decimal,
    quantity: i32,
    comment: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    sweet_name: Option<String>,
    sweet_category: Option<String>,
    sweet_image: Option<String>,
}

impl HistoryRow {
    fn into_entry(self) -> HistoryEntry {
        HistoryEntry {
            id: self.id,
            sweet_id: self.sweet_id,
            sweet_name: self.sweet_name.unwrap_or_else(|| UNAVAILABLE_NAME.into()),
            sweet_category: self.sweet_category.unwrap_or_else(|| "Unknown".into()),
            sweet_image: self.sweet_image.unwrap_or_else(|| PLACEHOLDER_IMAGE.into()),
            price: self.price,
            quantity: self.quantity,
            comment: self.comment,
            created_at: self.created_at,
        }
    }
}
