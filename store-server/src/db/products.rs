//! Product database operations
//!
//! Every statement that touches `qty` recomputes `in_stock` in the same
//! statement, so the `in_stock == (qty > 0)` invariant cannot be observed
//! broken.

use shared::models::{Product, ProductUpdate};
use sqlx::PgPool;

pub async fn insert(pool: &PgPool, product: &Product) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO products (id, owner_id, name, brand, category, description, images,
                               price, qty, in_stock, total_sales, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9 > 0, 0, $10, $11)",
    )
    .bind(&product.id)
    .bind(&product.owner_id)
    .bind(&product.name)
    .bind(&product.brand)
    .bind(&product.category)
    .bind(&product.description)
    .bind(&product.images)
    .bind(product.price)
    .bind(product.qty)
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_latest(pool: &PgPool, limit: i64) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products ORDER BY created_at DESC LIMIT $1")
        .bind(limit)
        .fetch_all(pool)
        .await
}

pub async fn update(
    pool: &PgPool,
    id: &str,
    upd: &ProductUpdate,
    now: i64,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE products SET
            name = COALESCE($2, name),
            brand = COALESCE($3, brand),
            category = COALESCE($4, category),
            description = COALESCE($5, description),
            images = COALESCE($6, images),
            price = COALESCE($7, price),
            qty = COALESCE($8, qty),
            in_stock = COALESCE($8, qty) > 0,
            updated_at = $9
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(upd.name.as_deref())
    .bind(upd.brand.as_deref())
    .bind(upd.category.as_deref())
    .bind(upd.description.as_deref())
    .bind(upd.images.as_deref())
    .bind(upd.price)
    .bind(upd.qty)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Apply a confirmed sale: relative decrement floored at zero plus the
/// matching `total_sales` bump, in one atomic statement so concurrent
/// confirmations cannot lose updates.
pub async fn record_sale(
    pool: &PgPool,
    id: &str,
    qty: i32,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE products SET
            qty = GREATEST(qty - $2, 0),
            total_sales = total_sales + $2,
            in_stock = GREATEST(qty - $2, 0) > 0,
            updated_at = $3
         WHERE id = $1",
    )
    .bind(id)
    .bind(qty)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
