//! Stripe webhook handler
//!
//! POST /payment-webhook — handles Stripe events. The handler takes the
//! raw request body: signature verification runs over the exact bytes the
//! gateway signed, before anything parses them.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::util::now_millis;

use crate::state::AppState;
use crate::{db, stripe};

/// Fields pulled out of a `checkout.session.completed` event
#[derive(Debug, PartialEq)]
struct CompletedSession {
    /// Order correlation id from session metadata
    order_id: String,
    paid: bool,
    /// Payer address as reported by the gateway (not the stored user)
    payer_email: Option<String>,
    payment_method: String,
    /// Gateway-applied discount, major units
    amount_discount: Option<f64>,
    /// Gateway-final total, major units
    amount_total: Option<f64>,
}

/// Extract the session fields; `None` when the event carries no order
/// correlation (malformed or foreign session).
fn parse_completed_session(event: &Value) -> Option<CompletedSession> {
    let obj = event.get("data")?.get("object")?;
    let order_id = obj
        .get("metadata")
        .and_then(|m| m.get("order_id"))
        .and_then(|v| v.as_str())?
        .to_string();

    Some(CompletedSession {
        order_id,
        paid: obj["payment_status"].as_str() == Some("paid"),
        payer_email: obj["customer_details"]["email"].as_str().map(String::from),
        payment_method: obj["payment_method_types"][0]
            .as_str()
            .unwrap_or("card")
            .to_string(),
        amount_discount: obj["total_details"]["amount_discount"]
            .as_i64()
            .map(stripe::from_cents),
        amount_total: obj["amount_total"].as_i64().map(stripe::from_cents),
    })
}

/// Handle incoming Stripe webhook events
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // 1. Signature gate — nothing mutates before this passes
    let sig_header = match headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
    {
        Some(s) => s,
        None => {
            tracing::warn!("Missing Stripe-Signature header");
            return AppError::with_message(
                ErrorCode::WebhookSignatureInvalid,
                "Missing Stripe-Signature header",
            )
            .into_response();
        }
    };

    if let Err(e) = stripe::verify_webhook_signature(&body, sig_header, &state.stripe.webhook_secret)
    {
        tracing::warn!(error = e, "Webhook signature verification failed");
        return AppError::with_message(ErrorCode::WebhookSignatureInvalid, e).into_response();
    }

    // 2. Parse and classify the event
    let event: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(%e, "Failed to parse webhook JSON");
            return AppError::new(ErrorCode::WebhookPayloadInvalid).into_response();
        }
    };

    let event_type = event["type"].as_str().unwrap_or("");
    tracing::info!(event_type = event_type, "Received payment webhook");

    match event_type {
        "checkout.session.completed" => match parse_completed_session(&event) {
            Some(session) if session.paid => settle_order(&state, session).await,
            Some(session) => {
                tracing::info!(
                    order_id = %session.order_id,
                    "Session completed without payment, ignoring"
                );
            }
            None => {
                tracing::warn!("checkout.session.completed has no order metadata, ignoring");
            }
        },
        _ => {
            tracing::debug!(event_type = event_type, "Unhandled webhook event type");
        }
    }

    // Always acknowledge once the signature passed and the event was
    // classified; reconciliation errors above are logged, not returned, so
    // the gateway does not retry a permanently-unprocessable event.
    (StatusCode::OK, Json(json!({ "received": true }))).into_response()
}

/// Reconcile a paid checkout session with its order.
///
/// The paid transition is the authoritative mutation and runs first;
/// inventory and the confirmation email are best-effort afterwards and
/// never undo it.
async fn settle_order(state: &AppState, session: CompletedSession) {
    let now = now_millis();
    let order = match db::orders::mark_paid(
        &state.pool,
        &session.order_id,
        session.amount_discount,
        session.amount_total,
        now,
    )
    .await
    {
        Ok(Some(order)) => order,
        Ok(None) => {
            // Either the order never existed or a concurrent delivery won
            // the pending→paid race; both are no-ops for this delivery.
            match db::orders::find_by_id(&state.pool, &session.order_id).await {
                Ok(Some(_)) => {
                    tracing::info!(order_id = %session.order_id, "Order already paid, skipping")
                }
                Ok(None) => {
                    tracing::warn!(order_id = %session.order_id, "No order for webhook, skipping")
                }
                Err(e) => {
                    tracing::error!(%e, order_id = %session.order_id, "DB error looking up order")
                }
            }
            return;
        }
        Err(e) => {
            tracing::error!(%e, order_id = %session.order_id, "DB error marking order paid");
            return;
        }
    };

    tracing::info!(
        order_id = %order.id,
        total = order.total_price,
        "Order confirmed paid"
    );

    // Inventory: each line updates independently; one failing product must
    // not block the others.
    for item in &order.cart_items {
        match db::products::record_sale(&state.pool, &item.product_id, item.qty, now).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(product_id = %item.product_id, "Product missing during stock update")
            }
            Err(e) => {
                tracing::error!(%e, product_id = %item.product_id, "Failed to update stock")
            }
        }
    }

    // Confirmation goes to the payer address the gateway collected
    let Some(email) = session.payer_email else {
        tracing::warn!(order_id = %order.id, "Session has no payer email, skipping confirmation");
        return;
    };
    if let Err(e) = state
        .mailer
        .send_payment_confirmation(&email, &order.id, &session.payment_method, order.total_price)
        .await
    {
        tracing::warn!(%e, order_id = %order.id, "Failed to send payment confirmation");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed_event(order_id: Option<&str>) -> Value {
        let mut metadata = json!({});
        if let Some(id) = order_id {
            metadata = json!({ "order_id": id });
        }
        json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "id": "cs_test_1",
                    "payment_status": "paid",
                    "payment_method_types": ["card"],
                    "customer_details": { "email": "buyer@example.com" },
                    "metadata": metadata,
                    "amount_total": 1500,
                    "total_details": { "amount_discount": 500 }
                }
            }
        })
    }

    #[test]
    fn test_parse_full_session() {
        let session = parse_completed_session(&completed_event(Some("order-1"))).unwrap();
        assert_eq!(session.order_id, "order-1");
        assert!(session.paid);
        assert_eq!(session.payer_email.as_deref(), Some("buyer@example.com"));
        assert_eq!(session.payment_method, "card");
        assert_eq!(session.amount_discount, Some(5.0));
        assert_eq!(session.amount_total, Some(15.0));
    }

    #[test]
    fn test_parse_without_order_metadata() {
        assert_eq!(parse_completed_session(&completed_event(None)), None);
        // No data.object at all
        assert_eq!(
            parse_completed_session(&json!({ "type": "checkout.session.completed" })),
            None
        );
    }

    #[test]
    fn test_parse_unpaid_session() {
        let mut event = completed_event(Some("order-1"));
        event["data"]["object"]["payment_status"] = json!("unpaid");
        let session = parse_completed_session(&event).unwrap();
        assert!(!session.paid);
    }

    #[test]
    fn test_parse_defaults_when_fields_absent() {
        let event = json!({
            "type": "checkout.session.completed",
            "data": { "object": { "metadata": { "order_id": "order-2" } } }
        });
        let session = parse_completed_session(&event).unwrap();
        assert_eq!(session.order_id, "order-2");
        assert!(!session.paid);
        assert_eq!(session.payer_email, None);
        assert_eq!(session.payment_method, "card");
        assert_eq!(session.amount_discount, None);
        assert_eq!(session.amount_total, None);
    }
}
