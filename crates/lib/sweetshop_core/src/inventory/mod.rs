//! Inventory service — the single authority over `Sweet.stock`.
//!
//! Every stock mutation (purchase reservation, restock, admin edit) goes
//! through this module. Reservations are a single conditional UPDATE so two
//! racing callers can never both pass the same stock boundary; callers never
//! read-modify-write stock themselves.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::sweet::{NewSweet, PLACEHOLDER_IMAGE, Sweet, SweetFilter, SweetPatch};

/// Inventory errors.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Sweet not found")]
    NotFound,

    #[error("Insufficient stock: requested {requested}, available {available}")]
    OutOfStock { requested: i32, available: i32 },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Atomically reserve `quantity` units of a sweet's stock.
///
/// The check and the decrement are one statement (`stock >= q` guard on the
/// UPDATE), which is what keeps stock non-negative under concurrent callers.
pub async fn reserve_stock(
    pool: &PgPool,
    sweet_id: Uuid,
    quantity: i32,
) -> Result<Sweet, InventoryError> {
    if quantity <= 0 {
        return Err(InventoryError::InvalidQuantity(quantity));
    }

    let updated = sqlx::query_as::<_, Sweet>(
        r#"
        UPDATE sweets
        SET stock = stock - $2, updated_at = now()
        WHERE id = $1 AND stock >= $2
        RETURNING id, name, description, category, price, stock, image, created_at, updated_at
        "#,
    )
    .bind(sweet_id)
    .bind(quantity)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(sweet) => Ok(sweet),
        // Zero rows: either the sweet is gone or the guard failed. Probe to
        // tell the two apart; `available` is informational and may already
        // be stale by the time the caller sees it.
        None => {
            let available =
                sqlx::query_scalar::<_, i32>("SELECT stock FROM sweets WHERE id = $1")
                    .bind(sweet_id)
                    .fetch_optional(pool)
                    .await?;
            match available {
                None => Err(InventoryError::NotFound),
                Some(available) => Err(InventoryError::OutOfStock {
                    requested: quantity,
                    available,
                }),
            }
        }
    }
}

/// Atomically add `quantity` units to a sweet's stock (restock).
pub async fn add_stock(
    pool: &PgPool,
    sweet_id: Uuid,
    quantity: i32,
) -> Result<Sweet, InventoryError> {
    if quantity <= 0 {
        return Err(InventoryError::InvalidQuantity(quantity));
    }

    sqlx::query_as::<_, Sweet>(
        r#"
        UPDATE sweets
        SET stock = stock + $2, updated_at = now()
        WHERE id = $1
        RETURNING id, name, description, category, price, stock, image, created_at, updated_at
        "#,
    )
    .bind(sweet_id)
    .bind(quantity)
    .fetch_optional(pool)
    .await?
    .ok_or(InventoryError::NotFound)
}

/// Create a sweet. Stock defaults to 0, image to the catalog placeholder.
pub async fn create_sweet(pool: &PgPool, fields: NewSweet) -> Result<Sweet, InventoryError> {
    validate_new(&fields)?;

    let image = match fields.image.as_deref() {
        Some(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ => PLACEHOLDER_IMAGE.to_string(),
    };

    let sweet = sqlx::query_as::<_, Sweet>(
        r#"
        INSERT INTO sweets (name, description, category, price, stock, image)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, description, category, price, stock, image, created_at, updated_at
        "#,
    )
    .bind(fields.name.trim())
    .bind(fields.description.trim())
    .bind(fields.category.trim())
    .bind(fields.price)
    .bind(fields.stock.unwrap_or(0))
    .bind(&image)
    .fetch_one(pool)
    .await?;

    Ok(sweet)
}

/// Partially update a sweet; `None` fields keep their current value.
pub async fn update_sweet(
    pool: &PgPool,
    sweet_id: Uuid,
    patch: SweetPatch,
) -> Result<Sweet, InventoryError> {
    validate_patch(&patch)?;

    sqlx::query_as::<_, Sweet>(
        r#"
        UPDATE sweets
        SET name        = COALESCE($2, name),
            description = COALESCE($3, description),
            category    = COALESCE($4, category),
            price       = COALESCE($5, price),
            stock       = COALESCE($6, stock),
            image       = COALESCE($7, image),
            updated_at  = now()
        WHERE id = $1
        RETURNING id, name, description, category, price, stock, image, created_at, updated_at
        "#,
    )
    .bind(sweet_id)
    .bind(patch.name.as_deref().map(str::trim))
    .bind(patch.description.as_deref().map(str::trim))
    .bind(patch.category.as_deref().map(str::trim))
    .bind(patch.price)
    .bind(patch.stock)
    .bind(patch.image.as_deref().map(str::trim))
    .fetch_optional(pool)
    .await?
    .ok_or(InventoryError::NotFound)
}

/// Hard-delete a sweet. Existing purchases keep a dangling reference
/// (their `sweet_id` goes NULL at the storage layer).
pub async fn delete_sweet(pool: &PgPool, sweet_id: Uuid) -> Result<(), InventoryError> {
    let result = sqlx::query("DELETE FROM sweets WHERE id = $1")
        .bind(sweet_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(InventoryError::NotFound);
    }
    Ok(())
}

/// Fetch a single sweet.
pub async fn get_sweet(pool: &PgPool, sweet_id: Uuid) -> Result<Option<Sweet>, InventoryError> {
    let sweet = sqlx::query_as::<_, Sweet>(
        r#"
        SELECT id, name, description, category, price, stock, image, created_at, updated_at
        FROM sweets
        WHERE id = $1
        "#,
    )
    .bind(sweet_id)
    .fetch_optional(pool)
    .await?;
    Ok(sweet)
}

/// List the whole catalog, newest first.
pub async fn list_sweets(pool: &PgPool) -> Result<Vec<Sweet>, InventoryError> {
    let sweets = sqlx::query_as::<_, Sweet>(
        r#"
        SELECT id, name, description, category, price, stock, image, created_at, updated_at
        FROM sweets
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(sweets)
}

/// Search the catalog. Name is a case-insensitive substring match, category
/// an exact (case-sensitive) match, prices an inclusive range.
pub async fn search(pool: &PgPool, filter: SweetFilter) -> Result<Vec<Sweet>, InventoryError> {
    let name_pattern = filter
        .name
        .as_deref()
        .map(|n| format!("%{}%", escape_like(n)));

    let sweets = sqlx::query_as::<_, Sweet>(
        r#"
        SELECT id, name, description, category, price, stock, image, created_at, updated_at
        FROM sweets
        WHERE ($1::text IS NULL OR name ILIKE $1)
          AND ($2::text IS NULL OR category = $2)
          AND ($3::numeric IS NULL OR price >= $3)
          AND ($4::numeric IS NULL OR price <= $4)
        ORDER BY created_at DESC
        "#,
    )
    .bind(name_pattern)
    .bind(filter.category)
    .bind(filter.min_price)
    .bind(filter.max_price)
    .fetch_all(pool)
    .await?;
    Ok(sweets)
}

/// Escape LIKE metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn validate_new(fields: &NewSweet) -> Result<(), InventoryError> {
    if fields.name.trim().is_empty() {
        return Err(InventoryError::Validation("Name is required".into()));
    }
    if fields.description.trim().is_empty() {
        return Err(InventoryError::Validation("Description is required".into()));
    }
    if fields.category.trim().is_empty() {
        return Err(InventoryError::Validation("Category is required".into()));
    }
    if fields.price <= Decimal::ZERO {
        return Err(InventoryError::Validation("Price must be positive".into()));
    }
    if fields.stock.is_some_and(|s| s < 0) {
        return Err(InventoryError::Validation(
            "Stock cannot be negative".into(),
        ));
    }
    Ok(())
}

fn validate_patch(patch: &SweetPatch) -> Result<(), InventoryError> {
    if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(InventoryError::Validation("Name cannot be blank".into()));
    }
    if patch
        .description
        .as_deref()
        .is_some_and(|d| d.trim().is_empty())
    {
        return Err(InventoryError::Validation(
            "Description cannot be blank".into(),
        ));
    }
    if patch
        .category
        .as_deref()
        .is_some_and(|c| c.trim().is_empty())
    {
        return Err(InventoryError::Validation("Category cannot be blank".into()));
    }
    if patch.price.is_some_and(|p| p <= Decimal::ZERO) {
        return Err(InventoryError::Validation("Price must be positive".into()));
    }
    if patch.stock.is_some_and(|s| s < 0) {
        return Err(InventoryError::Validation(
            "Stock cannot be negative".into(),
        ));
    }
    Ok(())
}
