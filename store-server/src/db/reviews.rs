//! Review database operations

use shared::models::Review;
use sqlx::PgPool;

/// Insert a review; returns false when the (product, user) pair already
/// has one (the UNIQUE constraint makes the first review win).
pub async fn insert(pool: &PgPool, review: &Review) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO reviews (id, product_id, user_id, name, rating, comment, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         ON CONFLICT (product_id, user_id) DO NOTHING",
    )
    .bind(&review.id)
    .bind(&review.product_id)
    .bind(&review.user_id)
    .bind(&review.name)
    .bind(review.rating)
    .bind(&review.comment)
    .bind(review.created_at)
    .bind(review.updated_at)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Review>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM reviews WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_product(pool: &PgPool, product_id: &str) -> Result<Vec<Review>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM reviews WHERE product_id = $1 ORDER BY created_at DESC")
        .bind(product_id)
        .fetch_all(pool)
        .await
}

pub async fn update(
    pool: &PgPool,
    id: &str,
    rating: i32,
    comment: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE reviews SET rating = $1, comment = $2, updated_at = $3 WHERE id = $4")
        .bind(rating)
        .bind(comment)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
