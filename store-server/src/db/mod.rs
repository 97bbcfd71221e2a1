//! Database access layer

pub mod email_verifications;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;
