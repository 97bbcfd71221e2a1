//! Review endpoints
//!
//! One review per (product, user); only the author may edit or remove
//! theirs.

use axum::Extension;
use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::{Review, ReviewCreate};
use shared::util::now_millis;

use crate::auth::middleware::Identity;
use crate::db;
use crate::state::AppState;

use super::ApiResult;

fn validate_review(req: &ReviewCreate) -> Result<(), AppError> {
    if !(1..=5).contains(&req.rating) {
        return Err(AppError::new(ErrorCode::ReviewInvalidRating));
    }
    if req.comment.trim().is_empty() {
        return Err(AppError::validation("Comment must not be empty"));
    }
    Ok(())
}

/// GET /api/products/{id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<Vec<Review>> {
    if db::products::find_by_id(&state.pool, &product_id)
        .await?
        .is_none()
    {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }
    let reviews = db::reviews::list_for_product(&state.pool, &product_id).await?;
    Ok(Json(reviews))
}

/// POST /api/products/{id}/reviews
pub async fn create_review(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(product_id): Path<String>,
    Json(req): Json<ReviewCreate>,
) -> ApiResult<Review> {
    validate_review(&req)?;

    if db::products::find_by_id(&state.pool, &product_id)
        .await?
        .is_none()
    {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }

    let now = now_millis();
    let review = Review {
        id: uuid::Uuid::new_v4().to_string(),
        product_id: product_id.clone(),
        user_id: identity.user_id.clone(),
        name: identity.name.clone(),
        rating: req.rating,
        comment: req.comment.trim().to_string(),
        created_at: now,
        updated_at: now,
    };

    // The UNIQUE (product_id, user_id) constraint makes the first review
    // win; a duplicate insert affects no rows.
    if !db::reviews::insert(&state.pool, &review).await? {
        return Err(AppError::new(ErrorCode::ReviewAlreadyExists).into());
    }

    tracing::info!(product_id = %product_id, user_id = %identity.user_id, "Review created");

    Ok(Json(review))
}

/// Load a review and check it belongs to the product and the caller
async fn load_own_review(
    state: &AppState,
    product_id: &str,
    review_id: &str,
    identity: &Identity,
) -> Result<Review, crate::error::ServiceError> {
    let review = db::reviews::find_by_id(&state.pool, review_id)
        .await?
        .filter(|r| r.product_id == product_id)
        .ok_or_else(|| AppError::new(ErrorCode::ReviewNotFound))?;
    if review.user_id != identity.user_id {
        return Err(AppError::permission_denied("Not your review").into());
    }
    Ok(review)
}

/// PUT /api/products/{id}/reviews/{review_id}
pub async fn update_review(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((product_id, review_id)): Path<(String, String)>,
    Json(req): Json<ReviewCreate>,
) -> ApiResult<Value> {
    validate_review(&req)?;
    load_own_review(&state, &product_id, &review_id, &identity).await?;

    db::reviews::update(
        &state.pool,
        &review_id,
        req.rating,
        req.comment.trim(),
        now_millis(),
    )
    .await?;

    Ok(Json(json!({ "message": "Review updated successfully" })))
}

/// DELETE /api/products/{id}/reviews/{review_id}
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((product_id, review_id)): Path<(String, String)>,
) -> ApiResult<Value> {
    load_own_review(&state, &product_id, &review_id, &identity).await?;

    db::reviews::delete(&state.pool, &review_id).await?;

    Ok(Json(json!({ "message": "Review deleted successfully" })))
}
