//! Account endpoints
//!
//! POST /api/auth/register        — create unverified user + send signup code
//! POST /api/auth/verify-email    — exchange code → verified account
//! POST /api/auth/resend-code     — re-issue signup code
//! POST /api/auth/login           — verified users only → token pair
//! POST /api/auth/refresh         — refresh token → new token pair
//! POST /api/auth/forgot-password — always-200 reset code issue
//! POST /api/auth/reset-password  — exchange code → new password

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::{User, UserSummary};
use shared::util::now_millis;

use crate::auth::jwt::{self, TokenKind, TokenPair};
use crate::db;
use crate::db::email_verifications::{PURPOSE_PASSWORD_RESET, PURPOSE_SIGNUP};
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::{generate_code, hash_password, verify_password};

use super::ApiResult;

const CODE_TTL_MILLIS: i64 = 5 * 60 * 1000;
const MAX_CODE_ATTEMPTS: i32 = 3;

// ── Helpers ──

fn hash_or_internal(value: &str) -> Result<String, ServiceError> {
    match hash_password(value) {
        Ok(h) => Ok(h),
        Err(e) => {
            tracing::error!(%e, "Password hash error");
            Err(AppError::new(ErrorCode::InternalError).into())
        }
    }
}

/// Generate, store and email a one-time code for the given purpose
async fn issue_code(state: &AppState, email: &str, purpose: &str) -> Result<(), ServiceError> {
    let code = generate_code();
    let code_hash = hash_or_internal(&code)?;
    let now = now_millis();

    db::email_verifications::upsert(
        &state.pool,
        email,
        purpose,
        &code_hash,
        now + CODE_TTL_MILLIS,
        now,
    )
    .await?;

    let sent = match purpose {
        PURPOSE_PASSWORD_RESET => state.mailer.send_password_reset_code(email, &code).await,
        _ => state.mailer.send_verification_code(email, &code).await,
    };
    if let Err(e) = sent {
        tracing::error!(%e, email = email, "Failed to send code email");
        return Err(AppError::internal("Failed to send email").into());
    }
    Ok(())
}

/// Validate and consume a one-time code (expiry, attempt cap, hash check)
async fn consume_code(
    state: &AppState,
    email: &str,
    purpose: &str,
    code: &str,
) -> Result<(), ServiceError> {
    let record = db::email_verifications::find(&state.pool, email, purpose)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::NotFound, "No verification pending for this email")
        })?;

    let now = now_millis();
    if now > record.expires_at {
        return Err(AppError::new(ErrorCode::VerificationCodeExpired).into());
    }
    if record.attempts >= MAX_CODE_ATTEMPTS {
        return Err(AppError::new(ErrorCode::TooManyAttempts).into());
    }

    db::email_verifications::increment_attempts(&state.pool, email, purpose).await?;

    if !verify_password(code, &record.code) {
        return Err(AppError::new(ErrorCode::VerificationCodeInvalid).into());
    }

    let _ = db::email_verifications::delete(&state.pool, email, purpose).await;
    Ok(())
}

// ── POST /api/auth/register ──

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<UserSummary> {
    let name = req.name.trim().to_string();
    let email = req.email.trim().to_lowercase();

    if name.is_empty() {
        return Err(AppError::validation("Name must not be empty").into());
    }
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("Invalid email").into());
    }
    if req.password.len() < 8 {
        return Err(AppError::new(ErrorCode::PasswordTooShort).into());
    }

    if db::users::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::new(ErrorCode::EmailInUse).into());
    }

    let password_hash = hash_or_internal(&req.password)?;
    let now = now_millis();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        email,
        password_hash,
        is_admin: false,
        is_seller: false,
        is_verified: false,
        created_at: now,
        updated_at: now,
    };
    db::users::create(&state.pool, &user).await?;

    issue_code(&state, &user.email, PURPOSE_SIGNUP).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "User registered, verification code sent");

    Ok(Json(UserSummary::from(&user)))
}

// ── POST /api/auth/verify-email ──

#[derive(Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub code: String,
}

pub async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyEmailRequest>,
) -> ApiResult<Value> {
    let email = req.email.trim().to_lowercase();

    let user = db::users::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    if user.is_verified {
        return Err(AppError::new(ErrorCode::AlreadyVerified).into());
    }

    consume_code(&state, &email, PURPOSE_SIGNUP, &req.code).await?;

    db::users::set_verified(&state.pool, &user.id, now_millis()).await?;
    tracing::info!(user_id = %user.id, "Email verified");

    Ok(Json(json!({ "message": "Email verified successfully" })))
}

// ── POST /api/auth/resend-code ──

#[derive(Deserialize)]
pub struct ResendCodeRequest {
    pub email: String,
}

pub async fn resend_code(
    State(state): State<AppState>,
    Json(req): Json<ResendCodeRequest>,
) -> ApiResult<Value> {
    let email = req.email.trim().to_lowercase();

    let user = db::users::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    if user.is_verified {
        return Err(AppError::new(ErrorCode::AlreadyVerified).into());
    }

    issue_code(&state, &email, PURPOSE_SIGNUP).await?;

    Ok(Json(json!({ "message": "Verification code sent" })))
}

// ── POST /api/auth/login ──

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(serde::Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserSummary,
    pub access_token: String,
    pub refresh_token: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let email = req.email.trim().to_lowercase();

    // Same error for unknown email and wrong password
    let user = db::users::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;
    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::new(ErrorCode::InvalidCredentials).into());
    }
    if !user.is_verified {
        return Err(AppError::new(ErrorCode::EmailNotVerified).into());
    }

    let pair = issue_pair_or_internal(&user.id, &state.jwt_secret)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        user: UserSummary::from(&user),
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

fn issue_pair_or_internal(user_id: &str, secret: &str) -> Result<TokenPair, ServiceError> {
    jwt::issue_token_pair(user_id, secret).map_err(|e| {
        tracing::error!(%e, "JWT creation failed");
        AppError::new(ErrorCode::InternalError).into()
    })
}

// ── POST /api/auth/refresh ──

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<TokenPair> {
    let claims = jwt::verify_token(&req.refresh_token, TokenKind::Refresh, &state.jwt_secret)?;

    let user = db::users::find_by_id(&state.pool, &claims.sub)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::TokenInvalid, "User no longer exists"))?;

    let pair = issue_pair_or_internal(&user.id, &state.jwt_secret)?;
    Ok(Json(pair))
}

// ── POST /api/auth/forgot-password ──

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Value> {
    let email = req.email.trim().to_lowercase();

    // Always return OK to prevent email enumeration
    if let Ok(Some(_)) = db::users::find_by_email(&state.pool, &email).await {
        if let Err(e) = issue_code(&state, &email, PURPOSE_PASSWORD_RESET).await {
            let app_err: AppError = e.into();
            tracing::warn!(error = %app_err, email = %email, "Failed to issue reset code");
        }
    }

    Ok(Json(json!({
        "message": "If the email exists, a reset code has been sent"
    })))
}

// ── POST /api/auth/reset-password ──

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Value> {
    let email = req.email.trim().to_lowercase();

    if req.new_password.len() < 8 {
        return Err(AppError::new(ErrorCode::PasswordTooShort).into());
    }

    let user = db::users::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    consume_code(&state, &email, PURPOSE_PASSWORD_RESET, &req.code).await?;

    let password_hash = hash_or_internal(&req.new_password)?;
    db::users::update_password(&state.pool, &user.id, &password_hash, now_millis()).await?;

    tracing::info!(user_id = %user.id, "Password reset");

    Ok(Json(json!({ "message": "Password has been reset" })))
}
