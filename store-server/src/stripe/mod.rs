//! Stripe integration via REST API (no SDK dependency)

use hmac::{Hmac, Mac};
use sha2::Sha256;
use shared::models::CartItem;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Unit price in major units → integer cents (Stripe's smallest unit)
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Gateway cents → major units
pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Create a Stripe Checkout Session (payment mode)
///
/// Line items come from the order's cart snapshot. The order id rides
/// along as session metadata so the asynchronous webhook can be
/// correlated back to exactly one order.
pub async fn create_checkout_session(
    secret_key: &str,
    items: &[CartItem],
    order_id: &str,
    success_url: &str,
    cancel_url: &str,
) -> Result<String, BoxError> {
    let mut params: Vec<(String, String)> = vec![
        ("mode".into(), "payment".into()),
        ("success_url".into(), success_url.into()),
        ("cancel_url".into(), cancel_url.into()),
        ("allow_promotion_codes".into(), "true".into()),
        ("metadata[order_id]".into(), order_id.into()),
    ];
    for (i, item) in items.iter().enumerate() {
        params.push((
            format!("line_items[{i}][price_data][currency]"),
            "usd".into(),
        ));
        params.push((
            format!("line_items[{i}][price_data][product_data][name]"),
            item.name.clone(),
        ));
        params.push((
            format!("line_items[{i}][price_data][unit_amount]"),
            to_cents(item.price).to_string(),
        ));
        params.push((format!("line_items[{i}][quantity]"), item.qty.to_string()));
    }

    let client = reqwest::Client::new();
    let resp: serde_json::Value = client
        .post("https://api.stripe.com/v1/checkout/sessions")
        .basic_auth(secret_key, None::<&str>)
        .form(&params)
        .send()
        .await?
        .json()
        .await?;

    resp["id"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| format!("Stripe create_checkout failed: {resp}").into())
}

/// Verify Stripe webhook signature (HMAC-SHA256)
pub fn verify_webhook_signature(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
) -> Result<(), &'static str> {
    let mut timestamp = "";
    let mut signature = "";
    for part in sig_header.split(',') {
        if let Some(t) = part.strip_prefix("t=") {
            timestamp = t;
        } else if let Some(v) = part.strip_prefix("v1=") {
            signature = v;
        }
    }

    if timestamp.is_empty() || signature.is_empty() {
        return Err("Invalid Stripe-Signature header");
    }

    let signed_payload = format!("{timestamp}.{}", std::str::from_utf8(payload).unwrap_or(""));
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| "HMAC key error")?;
    mac.update(signed_payload.as_bytes());

    // Decode hex signature and use constant-time comparison via hmac::verify_slice
    let sig_bytes = hex::decode(signature).map_err(|_| "Invalid signature hex")?;
    mac.verify_slice(&sig_bytes)
        .map_err(|_| "Webhook signature mismatch")?;

    // Reject events older than 5 minutes to prevent replay attacks
    let ts: i64 = timestamp.parse().map_err(|_| "Invalid timestamp")?;
    let now = chrono::Utc::now().timestamp();
    if (now - ts).abs() > 300 {
        return Err("Webhook timestamp too old");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn sign(payload: &[u8], secret: &str, ts: i64) -> String {
        let signed = format!("{ts}.{}", std::str::from_utf8(payload).unwrap());
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed.as_bytes());
        format!("t={ts},v1={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn test_valid_signature_accepted() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let header = sign(payload, SECRET, chrono::Utc::now().timestamp());
        assert!(verify_webhook_signature(payload, &header, SECRET).is_ok());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let payload = br#"{"amount":100}"#;
        let header = sign(payload, SECRET, chrono::Utc::now().timestamp());
        let forged = br#"{"amount":999}"#;
        assert!(verify_webhook_signature(forged, &header, SECRET).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = br#"{}"#;
        let header = sign(payload, "whsec_other", chrono::Utc::now().timestamp());
        assert!(verify_webhook_signature(payload, &header, SECRET).is_err());
    }

    #[test]
    fn test_malformed_header_rejected() {
        let payload = br#"{}"#;
        assert!(verify_webhook_signature(payload, "", SECRET).is_err());
        assert!(verify_webhook_signature(payload, "t=123", SECRET).is_err());
        assert!(verify_webhook_signature(payload, "v1=deadbeef", SECRET).is_err());
        assert!(verify_webhook_signature(payload, "t=123,v1=not-hex", SECRET).is_err());
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let payload = br#"{}"#;
        let header = sign(payload, SECRET, chrono::Utc::now().timestamp() - 3600);
        assert_eq!(
            verify_webhook_signature(payload, &header, SECRET),
            Err("Webhook timestamp too old")
        );
    }

    #[test]
    fn test_cents_conversion() {
        assert_eq!(to_cents(10.0), 1000);
        assert_eq!(to_cents(19.99), 1999);
        assert_eq!(to_cents(0.105), 11);
        assert_eq!(from_cents(1999), 19.99);
    }
}
