//! Authentication route handlers.
//!
//! Registration runs the OTP funnel: create the account unverified, email a
//! verify-email code, and activate on confirmation. Login issues the
//! session cookie that every privileged route trusts instead of anything
//! the client asserts about itself.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use slipstone_core::{Email, OtpPurpose};

use crate::error::{AppError, Result};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::ContactProfile;
use crate::services::otp::purpose_action;
use crate::services::{AuthService, OtpService, email};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
}

/// Verify-registration request body.
#[derive(Debug, Deserialize)]
pub struct VerifyRegisterRequest {
    pub email: String,
    pub otp: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// One-time-code request body.
#[derive(Debug, Deserialize)]
pub struct RequestOtpRequest {
    pub email: String,
    /// Which action the code is for; defaults to placing an order.
    #[serde(default)]
    pub purpose: OtpPurpose,
}

// =============================================================================
// Handlers
// =============================================================================

/// Create an account and send the verify-email code.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<Value>> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .register(
            &body.name,
            &body.email,
            &body.password,
            ContactProfile {
                phone: body.phone.as_deref(),
                address: body.address.as_deref(),
                city: body.city.as_deref(),
                zip: body.zip.as_deref(),
            },
        )
        .await?;

    send_otp(&state, &user.email, OtpPurpose::VerifyEmail).await?;

    Ok(Json(json!({ "step": "OTP_SENT" })))
}

/// Confirm the verify-email code and activate the account.
pub async fn verify_register(
    State(state): State<AppState>,
    Json(body): Json<VerifyRegisterRequest>,
) -> Result<Json<Value>> {
    let email = parse_email(&body.email)?;

    let otp = OtpService::new(state.pool());
    let user = otp.consume(&email, OtpPurpose::VerifyEmail, &body.otp).await?;

    AuthService::new(state.pool()).mark_verified(&user).await?;

    Ok(Json(json!({ "success": true, "msg": "account verified" })))
}

/// Password login. The session cookie set here is the auth token.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&body.email, &body.password).await?;

    let current = CurrentUser {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
    };

    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to write session: {e}")))?;

    Ok(Json(json!({
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "role": user.role,
        }
    })))
}

/// Clear the session.
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;

    Ok(Json(json!({ "success": true })))
}

/// Issue a one-time code for an OTP-gated action.
pub async fn request_otp(
    State(state): State<AppState>,
    Json(body): Json<RequestOtpRequest>,
) -> Result<Json<Value>> {
    let email = parse_email(&body.email)?;

    send_otp(&state, &email, body.purpose).await?;

    Ok(Json(json!({ "step": "OTP_SENT" })))
}

/// Issue a code and hand it to the mailer in the background.
async fn send_otp(state: &AppState, to: &Email, purpose: OtpPurpose) -> Result<()> {
    let otp = OtpService::new(state.pool());
    let issued = otp.issue(to, purpose).await?;

    let svc = state.email().clone();
    let to = issued.user.email.to_string();
    let code = issued.code;
    email::dispatch(async move { svc.send_otp_code(&to, &code, purpose_action(purpose)).await });

    Ok(())
}

fn parse_email(raw: &str) -> Result<Email> {
    Email::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}
