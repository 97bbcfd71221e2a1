//! API response envelope
//!
//! Error responses follow this format:
//! ```json
//! {
//!     "code": 4001,
//!     "message": "Order not found"
//! }
//! ```
//! Success payloads are returned as plain JSON bodies; the envelope's
//! `ok` constructor exists for endpoints that only report a message.

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Unified API response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Error code (0 for success)
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Response data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            code: ErrorCode::Success,
            message: "Success".to_string(),
            data: Some(data),
            details: None,
        }
    }

    /// Create a successful response with a custom message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success,
            message: message.into(),
            data: Some(data),
            details: None,
        }
    }

    /// Create an error response from an [`AppError`]
    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code,
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_serialization() {
        let resp = ApiResponse::ok(serde_json::json!({ "id": "abc" }));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["message"], "Success");
        assert_eq!(json["data"]["id"], "abc");
    }

    #[test]
    fn test_error_serialization_skips_data() {
        let err = AppError::new(ErrorCode::ProductNotFound);
        let resp = ApiResponse::<()>::error(&err);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 6001);
        assert_eq!(json["message"], "Product not found");
        assert!(json.get("data").is_none());
    }
}
