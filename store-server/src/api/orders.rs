//! Order endpoints
//!
//! Orders are created through the checkout flow only; here they can be
//! listed, fetched and deleted by their owner or an admin.

use axum::Extension;
use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::Order;

use crate::auth::middleware::{Identity, require_admin};
use crate::db;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/orders — all orders, admin only
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Vec<Order>> {
    require_admin(&identity)?;
    let orders = db::orders::list_all(&state.pool).await?;
    Ok(Json(orders))
}

/// GET /api/orders/mine — caller's orders
pub async fn list_my_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Vec<Order>> {
    let orders = db::orders::list_for_user(&state.pool, &identity.user_id).await?;
    Ok(Json(orders))
}

fn authorize_owner(order: &Order, identity: &Identity) -> Result<(), AppError> {
    if identity.is_admin || order.user_id == identity.user_id {
        Ok(())
    } else {
        Err(AppError::permission_denied(
            "Not authorized to access this order",
        ))
    }
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Order> {
    let order = db::orders::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    authorize_owner(&order, &identity)?;
    Ok(Json(order))
}

/// DELETE /api/orders/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let order = db::orders::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    authorize_owner(&order, &identity)?;

    db::orders::delete(&state.pool, &id).await?;

    tracing::info!(order_id = %id, user_id = %identity.user_id, "Order deleted");

    Ok(Json(json!({ "message": "Order has been deleted" })))
}
