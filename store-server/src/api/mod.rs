//! API routes

pub mod auth;
pub mod checkout;
pub mod health;
pub mod orders;
pub mod payment_webhook;
pub mod products;
pub mod reviews;

use axum::routing::{get, post, put};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::middleware::auth_middleware;
use crate::error::ServiceError;
use crate::state::AppState;

/// Result type for API handlers: plain JSON body on success, enveloped
/// error (via `AppError`) on failure.
pub type ApiResult<T> = Result<axum::Json<T>, ServiceError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Account flows + catalog reads (no auth)
    let public = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/verify-email", post(auth::verify_email))
        .route("/api/auth/resend-code", post(auth::resend_code))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .route("/api/products", get(products::list_products))
        .route("/api/products/{id}", get(products::get_product))
        .route("/api/products/{id}/reviews", get(reviews::list_reviews));

    // JWT-authenticated (access token)
    let authed = Router::new()
        .route("/api/products", post(products::create_product))
        .route(
            "/api/products/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/api/products/{id}/reviews", post(reviews::create_review))
        .route(
            "/api/products/{id}/reviews/{review_id}",
            put(reviews::update_review).delete(reviews::delete_review),
        )
        .route("/api/orders", get(orders::list_orders))
        .route("/api/orders/mine", get(orders::list_my_orders))
        .route(
            "/api/orders/{id}",
            get(orders::get_order).delete(orders::delete_order),
        )
        .route("/checkout-sessions", post(checkout::create_checkout_session))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Stripe webhook (signature-verified; handler takes the raw body —
    // verification is over the exact bytes, so nothing may parse it first)
    let webhook = Router::new().route("/payment-webhook", post(payment_webhook::handle_webhook));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public)
        .merge(authed)
        .merge(webhook)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
