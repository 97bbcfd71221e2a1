//! Order database operations
//!
//! `cart_items` and `shipping_address` live as JSONB snapshots; rows are
//! mapped by hand rather than derived so the JSON columns decode into
//! their value types.

use shared::models::{Order, OrderStatus};
use sqlx::PgPool;

use super::BoxError;

const COLUMNS: &str = "id, user_id, cart_items, shipping_address, total_price, \
                       discount_amount, is_paid, status, created_at, updated_at";

type OrderRow = (
    String,            // id
    String,            // user_id
    serde_json::Value, // cart_items
    serde_json::Value, // shipping_address
    f64,               // total_price
    f64,               // discount_amount
    bool,              // is_paid
    String,            // status
    i64,               // created_at
    i64,               // updated_at
);

fn from_row(row: OrderRow) -> Result<Order, BoxError> {
    let (
        id,
        user_id,
        cart_items,
        shipping_address,
        total_price,
        discount_amount,
        is_paid,
        status,
        created_at,
        updated_at,
    ) = row;
    let status =
        OrderStatus::from_db(&status).ok_or_else(|| format!("unknown order status: {status}"))?;
    Ok(Order {
        id,
        user_id,
        cart_items: serde_json::from_value(cart_items)?,
        shipping_address: serde_json::from_value(shipping_address)?,
        total_price,
        discount_amount,
        is_paid,
        status,
        created_at,
        updated_at,
    })
}

pub async fn create(pool: &PgPool, order: &Order) -> Result<(), BoxError> {
    sqlx::query(
        "INSERT INTO orders (id, user_id, cart_items, shipping_address, total_price,
                             discount_amount, is_paid, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(&order.id)
    .bind(&order.user_id)
    .bind(serde_json::to_value(&order.cart_items)?)
    .bind(serde_json::to_value(&order.shipping_address)?)
    .bind(order.total_price)
    .bind(order.discount_amount)
    .bind(order.is_paid)
    .bind(order.status.as_db())
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Order>, BoxError> {
    let row: Option<OrderRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    row.map(from_row).transpose()
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Order>, BoxError> {
    let rows: Vec<OrderRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM orders ORDER BY created_at DESC"))
            .fetch_all(pool)
            .await?;
    rows.into_iter().map(from_row).collect()
}

pub async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<Order>, BoxError> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(from_row).collect()
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// One-way `pending → paid` transition.
///
/// The status guard in the WHERE clause makes the check-then-act atomic:
/// of two concurrent webhook deliveries for the same order, exactly one
/// gets the row back and runs the side effects; the other sees `None`.
/// Gateway-reported totals, when present, override the stored amounts
/// (promotion codes are validated gateway-side).
pub async fn mark_paid(
    pool: &PgPool,
    id: &str,
    discount_amount: Option<f64>,
    total_price: Option<f64>,
    now: i64,
) -> Result<Option<Order>, BoxError> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
        "UPDATE orders SET
            is_paid = TRUE,
            status = 'paid',
            discount_amount = COALESCE($2, discount_amount),
            total_price = COALESCE($3, total_price),
            updated_at = $4
         WHERE id = $1 AND status = 'pending'
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(discount_amount)
    .bind(total_price)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    row.map(from_row).transpose()
}
