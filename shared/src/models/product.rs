//! Product and review models

use serde::{Deserialize, Serialize};

/// Catalog product
///
/// `in_stock` is derived from `qty` and recomputed by every statement
/// that mutates `qty`. `total_sales` only ever grows, bumped by the
/// purchased quantity when an order is confirmed paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    /// Creating admin/seller
    pub owner_id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub images: Vec<String>,
    pub price: f64,
    pub qty: i32,
    pub in_stock: bool,
    pub total_sales: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub images: Option<Vec<String>>,
    pub price: f64,
    pub qty: Option<i32>,
}

/// Update product payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub price: Option<f64>,
    pub qty: Option<i32>,
}

/// Product review
///
/// At most one review per (product, user) pair; `name` is the reviewer's
/// display name captured at review time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub user_id: String,
    pub name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create/update review payload
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewCreate {
    pub rating: i32,
    pub comment: String,
}
