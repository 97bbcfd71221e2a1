//! Checkout endpoint
//!
//! POST /checkout-sessions — persist a pending order, then request a
//! hosted Stripe Checkout Session carrying the order id as metadata.

use axum::Extension;
use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{CartItem, Order, OrderStatus, ShippingAddress};
use shared::util::now_millis;

use crate::auth::middleware::Identity;
use crate::db;
use crate::state::AppState;
use crate::stripe;

use super::ApiResult;

#[derive(Debug, Deserialize)]
pub struct CheckoutItem {
    pub product_id: String,
    pub qty: i32,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    pub shipping_address: ShippingAddress,
    pub total_price: f64,
    #[serde(default)]
    pub discount_amount: f64,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub session_id: String,
}

fn validate_request(req: &CheckoutRequest) -> Result<(), AppError> {
    if req.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    if req.items.iter().any(|i| i.qty < 1) {
        return Err(AppError::validation("Item quantity must be at least 1"));
    }
    if !req.total_price.is_finite() || req.total_price < 0.0 {
        return Err(AppError::validation("Total price must be non-negative"));
    }
    if !req.discount_amount.is_finite() || req.discount_amount < 0.0 {
        return Err(AppError::validation("Discount must be non-negative"));
    }
    if req.discount_amount > req.total_price {
        return Err(AppError::validation("Discount cannot exceed total price"));
    }
    Ok(())
}

pub async fn create_checkout_session(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<CheckoutResponse> {
    validate_request(&req)?;

    // Freeze the catalog state into cart lines. Prices come from the
    // catalog, not the client; later product edits leave the order as the
    // buyer saw it.
    let mut cart_items = Vec::with_capacity(req.items.len());
    for item in &req.items {
        let product = db::products::find_by_id(&state.pool, &item.product_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ProductNotFound,
                    format!("Product {} not found", item.product_id),
                )
            })?;
        cart_items.push(CartItem {
            product_id: product.id,
            name: product.name,
            qty: item.qty,
            price: product.price,
            image: product.images.first().cloned().unwrap_or_default(),
        });
    }

    // The pending order is persisted before the gateway call. If the
    // session request fails or is abandoned the row simply never
    // transitions; a retry creates a fresh order.
    let now = now_millis();
    let order = Order {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: identity.user_id.clone(),
        cart_items,
        shipping_address: req.shipping_address,
        total_price: req.total_price,
        discount_amount: req.discount_amount,
        is_paid: false,
        status: OrderStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    db::orders::create(&state.pool, &order).await?;

    let session_id = stripe::create_checkout_session(
        &state.stripe.secret_key,
        &order.cart_items,
        &order.id,
        &state.stripe.success_url,
        &state.stripe.cancel_url,
    )
    .await
    .map_err(|e| {
        tracing::error!(%e, order_id = %order.id, "Failed to create Stripe checkout");
        AppError::new(ErrorCode::PaymentSetupFailed)
    })?;

    tracing::info!(order_id = %order.id, session_id = %session_id, "Checkout session created");

    Ok(Json(CheckoutResponse { session_id }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            street: "1 Main St".to_string(),
            apartment: None,
            city: "Springfield".to_string(),
            state: None,
            country: "US".to_string(),
            postal_code: "12345".to_string(),
        }
    }

    fn request(items: Vec<CheckoutItem>, total: f64, discount: f64) -> CheckoutRequest {
        CheckoutRequest {
            items,
            shipping_address: address(),
            total_price: total,
            discount_amount: discount,
        }
    }

    fn item(qty: i32) -> CheckoutItem {
        CheckoutItem {
            product_id: "prod-1".to_string(),
            qty,
        }
    }

    #[test]
    fn test_empty_cart_rejected() {
        let err = validate_request(&request(vec![], 20.0, 0.0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let err = validate_request(&request(vec![item(0)], 20.0, 0.0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_discount_exceeding_total_rejected() {
        let err = validate_request(&request(vec![item(1)], 20.0, 25.0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_negative_amounts_rejected() {
        assert!(validate_request(&request(vec![item(1)], -1.0, 0.0)).is_err());
        assert!(validate_request(&request(vec![item(1)], 20.0, -1.0)).is_err());
    }

    #[test]
    fn test_valid_request_accepted() {
        assert!(validate_request(&request(vec![item(2)], 20.0, 5.0)).is_ok());
    }
}
