//! Unified error codes for the store backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient
/// serialization and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Email not verified
    EmailNotVerified = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Admin or seller role required
    SellerRequired = 2003,

    // ==================== 3xxx: Account ====================
    /// User not found
    UserNotFound = 3001,
    /// Email already registered
    EmailInUse = 3002,
    /// Verification code expired
    VerificationCodeExpired = 3003,
    /// Verification code invalid
    VerificationCodeInvalid = 3004,
    /// Too many verification attempts
    TooManyAttempts = 3005,
    /// Password too short
    PasswordTooShort = 3006,
    /// Account already verified
    AlreadyVerified = 3007,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been paid
    OrderAlreadyPaid = 4002,
    /// Order is empty
    OrderEmpty = 4003,

    // ==================== 5xxx: Payment ====================
    /// Checkout session creation failed (gateway)
    PaymentSetupFailed = 5001,
    /// Webhook signature mismatch
    WebhookSignatureInvalid = 5002,
    /// Webhook payload malformed
    WebhookPayloadInvalid = 5003,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Review not found
    ReviewNotFound = 6101,
    /// User already reviewed this product
    ReviewAlreadyExists = 6102,
    /// Rating out of range
    ReviewInvalidRating = 6103,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::NotAuthenticated => "Please login first",
            Self::InvalidCredentials => "Invalid email or password",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid token",
            Self::EmailNotVerified => "Email not verified",
            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin access required",
            Self::SellerRequired => "Admin or seller access required",
            Self::UserNotFound => "User not found",
            Self::EmailInUse => "Email already registered",
            Self::VerificationCodeExpired => "Verification code expired",
            Self::VerificationCodeInvalid => "Verification code invalid",
            Self::TooManyAttempts => "Too many attempts, request a new code",
            Self::PasswordTooShort => "Password must be at least 8 characters",
            Self::AlreadyVerified => "Account already verified",
            Self::OrderNotFound => "Order not found",
            Self::OrderAlreadyPaid => "Order has already been paid",
            Self::OrderEmpty => "Order has no items",
            Self::PaymentSetupFailed => "Failed to create checkout session",
            Self::WebhookSignatureInvalid => "Webhook signature verification failed",
            Self::WebhookPayloadInvalid => "Webhook payload malformed",
            Self::ProductNotFound => "Product not found",
            Self::ProductInvalidPrice => "Product price is invalid",
            Self::ReviewNotFound => "Review not found",
            Self::ReviewAlreadyExists => "You already reviewed this product",
            Self::ReviewInvalidRating => "Rating must be between 1 and 5",
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u16)
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code as u16
    }
}

/// Error returned when a u16 does not map to a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::TokenExpired,
            1004 => Self::TokenInvalid,
            1005 => Self::EmailNotVerified,
            2001 => Self::PermissionDenied,
            2002 => Self::AdminRequired,
            2003 => Self::SellerRequired,
            3001 => Self::UserNotFound,
            3002 => Self::EmailInUse,
            3003 => Self::VerificationCodeExpired,
            3004 => Self::VerificationCodeInvalid,
            3005 => Self::TooManyAttempts,
            3006 => Self::PasswordTooShort,
            3007 => Self::AlreadyVerified,
            4001 => Self::OrderNotFound,
            4002 => Self::OrderAlreadyPaid,
            4003 => Self::OrderEmpty,
            5001 => Self::PaymentSetupFailed,
            5002 => Self::WebhookSignatureInvalid,
            5003 => Self::WebhookPayloadInvalid,
            6001 => Self::ProductNotFound,
            6002 => Self::ProductInvalidPrice,
            6101 => Self::ReviewNotFound,
            6102 => Self::ReviewAlreadyExists,
            6103 => Self::ReviewInvalidRating,
            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u16_round_trip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::NotAuthenticated,
            ErrorCode::OrderAlreadyPaid,
            ErrorCode::WebhookSignatureInvalid,
            ErrorCode::ReviewAlreadyExists,
            ErrorCode::DatabaseError,
        ] {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw).unwrap(), code);
        }
    }

    #[test]
    fn test_unknown_value_rejected() {
        assert_eq!(ErrorCode::try_from(12345), Err(InvalidErrorCode(12345)));
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorCode::OrderNotFound);
    }
}
