//! JWT authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::{AppError, ErrorCode};

use crate::auth::jwt::{self, TokenKind};
use crate::db;
use crate::state::AppState;

/// Authenticated user identity extracted from a verified access token
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Identity {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub is_seller: bool,
}

/// Middleware that extracts and verifies the access token from the
/// Authorization header, loads the user, and injects [`Identity`]
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::new(ErrorCode::NotAuthenticated).into_response())?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::with_message(ErrorCode::NotAuthenticated, "Invalid Authorization format")
            .into_response()
    })?;

    let claims = jwt::verify_token(token, TokenKind::Access, &state.jwt_secret)
        .map_err(|e| e.into_response())?;

    // Token may outlive the account; unknown users are rejected
    let user = db::users::find_by_id(&state.pool, &claims.sub)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "DB error loading user for auth");
            AppError::new(ErrorCode::InternalError).into_response()
        })?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::TokenInvalid, "User no longer exists")
                .into_response()
        })?;

    request.extensions_mut().insert(Identity {
        user_id: user.id,
        name: user.name,
        email: user.email,
        is_admin: user.is_admin,
        is_seller: user.is_seller,
    });

    Ok(next.run(request).await)
}

/// Admin-only gate
pub fn require_admin(identity: &Identity) -> Result<(), AppError> {
    if identity.is_admin {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::AdminRequired))
    }
}

/// Admin-or-seller gate (catalog management)
pub fn require_admin_or_seller(identity: &Identity) -> Result<(), AppError> {
    if identity.is_admin || identity.is_seller {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::SellerRequired))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(is_admin: bool, is_seller: bool) -> Identity {
        Identity {
            user_id: "user-1".to_string(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            is_admin,
            is_seller,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&identity(true, false)).is_ok());
        let err = require_admin(&identity(false, true)).unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);
    }

    #[test]
    fn test_require_admin_or_seller() {
        assert!(require_admin_or_seller(&identity(true, false)).is_ok());
        assert!(require_admin_or_seller(&identity(false, true)).is_ok());
        let err = require_admin_or_seller(&identity(false, false)).unwrap_err();
        assert_eq!(err.code, ErrorCode::SellerRequired);
    }
}
