//! User model

use serde::{Deserialize, Serialize};

/// User account as stored
///
/// The password hash never leaves the server; API responses use
/// [`UserSummary`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_seller: bool,
    pub is_verified: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Public view of a user, safe to return from the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub is_seller: bool,
    pub is_verified: bool,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            is_seller: user.is_seller,
            is_verified: user.is_verified,
        }
    }
}
