//! Shared types for the store backend
//!
//! Common types used by the server crates: domain models, the unified
//! error system, and the API response envelope.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use response::ApiResponse;
pub use serde::{Deserialize, Serialize};
