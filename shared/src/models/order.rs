//! Order model
//!
//! Cart lines are a value snapshot of the catalog taken when the order is
//! created: later edits to a product never change what an existing order
//! records, and line prices are what the buyer actually saw.

use serde::{Deserialize, Serialize};

/// One line of an order, frozen at order-creation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub qty: i32,
    /// Unit price at the time the order was created
    pub price: f64,
    pub image: String,
}

/// Shipping address embedded in the order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    pub postal_code: String,
}

/// Order payment state
///
/// `Pending → Paid` is the only transition; `Paid` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
}

impl OrderStatus {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

/// Customer order
///
/// Invariant: `is_paid == (status == Paid)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub cart_items: Vec<CartItem>,
    pub shipping_address: ShippingAddress,
    pub total_price: f64,
    pub discount_amount: f64,
    pub is_paid: bool,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_db_round_trip() {
        assert_eq!(OrderStatus::from_db("pending"), Some(OrderStatus::Pending));
        assert_eq!(OrderStatus::from_db("paid"), Some(OrderStatus::Paid));
        assert_eq!(OrderStatus::from_db("refunded"), None);
        assert_eq!(OrderStatus::Pending.as_db(), "pending");
        assert_eq!(OrderStatus::Paid.as_db(), "paid");
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
        let back: OrderStatus = serde_json::from_str("\"paid\"").unwrap();
        assert_eq!(back, OrderStatus::Paid);
    }

    #[test]
    fn test_cart_item_snapshot_round_trip() {
        let item = CartItem {
            product_id: "prod-1".to_string(),
            name: "Wireless Mouse".to_string(),
            qty: 2,
            price: 10.0,
            image: "https://cdn.example.com/mouse.jpg".to_string(),
        };
        let json = serde_json::to_value(&item).unwrap();
        let back: CartItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_shipping_address_optional_fields() {
        let json = serde_json::json!({
            "street": "1 Main St",
            "city": "Springfield",
            "country": "US",
            "postal_code": "12345"
        });
        let addr: ShippingAddress = serde_json::from_value(json).unwrap();
        assert_eq!(addr.apartment, None);
        assert_eq!(addr.state, None);
    }
}
