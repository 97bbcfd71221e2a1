//! Bearer token pairs
//!
//! Access and refresh tokens are HS256 JWTs carrying `{sub, type, iss,
//! aud, exp, iat}`. The two kinds are never interchangeable: a refresh
//! token presented where an access token is required is rejected, and
//! vice versa.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

pub const ISSUER: &str = "store-server";
pub const AUDIENCE: &str = "store-client";

const ACCESS_EXPIRY_MINUTES: i64 = 15;
const REFRESH_EXPIRY_DAYS: i64 = 30;

/// Token kind, embedded in the `type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Token kind (access/refresh)
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Access/refresh token pair returned on login and refresh
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn encode_token(
    user_id: &str,
    kind: TokenKind,
    ttl: chrono::Duration,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        kind,
        iss: ISSUER.to_string(),
        aud: AUDIENCE.to_string(),
        exp: (now + ttl).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Issue a fresh access/refresh pair for a user
pub fn issue_token_pair(
    user_id: &str,
    secret: &str,
) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    Ok(TokenPair {
        access_token: encode_token(
            user_id,
            TokenKind::Access,
            chrono::Duration::minutes(ACCESS_EXPIRY_MINUTES),
            secret,
        )?,
        refresh_token: encode_token(
            user_id,
            TokenKind::Refresh,
            chrono::Duration::days(REFRESH_EXPIRY_DAYS),
            secret,
        )?,
    })
}

/// Decode and validate a token, requiring a specific kind
///
/// Rejects on signature failure, expiry, wrong issuer/audience, and
/// kind mismatch.
pub fn verify_token(token: &str, kind: TokenKind, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[ISSUER]);
    validation.set_audience(&[AUDIENCE]);

    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::new(ErrorCode::TokenExpired)
            }
            _ => AppError::new(ErrorCode::TokenInvalid),
        }
    })?;

    if data.claims.kind != kind {
        return Err(AppError::with_message(
            ErrorCode::TokenInvalid,
            "Wrong token type",
        ));
    }

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_access_token_round_trip() {
        let pair = issue_token_pair("user-1", SECRET).unwrap();
        let claims = verify_token(&pair.access_token, TokenKind::Access, SECRET).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let pair = issue_token_pair("user-1", SECRET).unwrap();
        let claims = verify_token(&pair.refresh_token, TokenKind::Refresh, SECRET).unwrap();
        assert_eq!(claims.kind, TokenKind::Refresh);
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let pair = issue_token_pair("user-1", SECRET).unwrap();
        // Refresh token where an access token is required, and vice versa
        let err = verify_token(&pair.refresh_token, TokenKind::Access, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
        let err = verify_token(&pair.access_token, TokenKind::Refresh, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let pair = issue_token_pair("user-1", SECRET).unwrap();
        let err = verify_token(&pair.access_token, TokenKind::Access, "other-secret").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_expired_token_rejected() {
        let expired = encode_token(
            "user-1",
            TokenKind::Access,
            chrono::Duration::hours(-2),
            SECRET,
        )
        .unwrap();
        let err = verify_token(&expired, TokenKind::Access, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: "user-1".to_string(),
            kind: TokenKind::Access,
            iss: "someone-else".to_string(),
            aud: AUDIENCE.to_string(),
            exp: (now + chrono::Duration::hours(1)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let err = verify_token(&token, TokenKind::Access, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }
}
