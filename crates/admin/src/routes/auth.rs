//! Authentication lifecycle: login, logout, session check, registration and
//! password reset.

use axum::{
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse},
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::auth::{
    RequireAdminAuth, RequireSuperAdmin, clear_session_cookie, session_cookie,
};
use crate::models::{AdminRole, CurrentAdmin};
use crate::services::auth::tokens::SESSION_TTL_SECS;
use crate::state::AppState;

const RESET_SENT_MESSAGE: &str =
    "If an account with that email exists, a password reset link has been sent";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
    pub token: String,
    pub user: CurrentAdmin,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let session = state.auth().login(&req.email, &req.password).await?;
    let cookie = session_cookie(
        &session.token,
        SESSION_TTL_SECS,
        state.config().secure_cookies,
    );

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse {
            success: true,
            message: "Login successful",
            token: session.token,
            user: session.user.into(),
        }),
    ))
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie(state.config().secure_cookies))]),
        Json(serde_json::json!({ "success": true, "message": "Logged out successfully" })),
    )
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub user: CurrentAdmin,
}

pub async fn validate(RequireAdminAuth(admin): RequireAdminAuth) -> Json<ValidateResponse> {
    Json(ValidateResponse { user: admin })
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<AdminRole>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: CurrentAdmin,
}

pub async fn register(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Name, email and password are required".to_string(),
        ));
    }

    let user = state
        .auth()
        .register(
            &req.name,
            &req.email,
            &req.password,
            req.role.unwrap_or_default(),
        )
        .await?;
    tracing::info!(registered_by = %admin.id, admin_id = %user.id, "New admin created");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Admin registered successfully",
            user: user.into(),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

/// Email a reset link when the address has an account.
///
/// The response is the same either way.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    if req.email.trim().is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }

    let Some((user, token)) = state.auth().start_password_reset(&req.email).await? else {
        tracing::debug!("Password reset requested for unknown email");
        return Ok(Json(serde_json::json!({ "message": RESET_SENT_MESSAGE })));
    };

    let email = state
        .email()
        .ok_or_else(|| AppError::Internal("SMTP is not configured".to_string()))?;
    let link = state.config().password_reset_link(&token);
    email
        .send_password_reset(user.email.as_str(), &link)
        .await?;

    tracing::info!(admin_id = %user.id, "Password reset link sent");
    Ok(Json(serde_json::json!({ "message": RESET_SENT_MESSAGE })))
}

#[derive(Debug, Deserialize)]
pub struct ResetTokenRequest {
    #[serde(default)]
    pub token: String,
}

pub async fn validate_reset_token(
    State(state): State<AppState>,
    Json(req): Json<ResetTokenRequest>,
) -> Result<Json<serde_json::Value>> {
    if req.token.trim().is_empty() {
        return Err(AppError::BadRequest("Token is required".to_string()));
    }

    state.auth().check_reset_token(req.token.trim())?;
    Ok(Json(serde_json::json!({ "valid": true })))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    if req.token.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Token and password are required".to_string(),
        ));
    }

    state
        .auth()
        .reset_password(req.token.trim(), &req.password)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Password has been reset successfully",
    })))
}
