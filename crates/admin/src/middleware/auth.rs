//! Authentication extractors for admin.
//!
//! The session token is read from `Authorization: Bearer <token>`, falling
//! back to the `token` cookie set at login. The admin record is re-read on
//! every request.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn protected_handler(
//!     RequireAdminAuth(admin): RequireAdminAuth,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", admin.name)
//! }
//! ```

use axum::{
    Json,
    extract::FromRequestParts,
    http::{
        HeaderMap, StatusCode,
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
    },
    response::{IntoResponse, Response},
};
use cookie::{Cookie, SameSite, time::Duration};
use serde_json::json;

use crate::error::set_sentry_user;
use crate::models::{AdminRole, CurrentAdmin};
use crate::services::AuthError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Extractor that requires an authenticated admin.
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Error returned when admin authentication fails.
#[derive(Debug)]
pub enum AdminAuthRejection {
    /// No token, a bad token, or the admin no longer exists.
    Unauthorized(&'static str),
    /// The lookup itself failed.
    Internal,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
            }
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdminAuth {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers)
            .ok_or(AdminAuthRejection::Unauthorized("No token provided"))?;

        let admin = state.auth().authenticate(&token).await.map_err(|e| match e {
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::WrongPurpose => {
                AdminAuthRejection::Unauthorized("Invalid or expired token")
            }
            AuthError::UserNotFound => AdminAuthRejection::Unauthorized("User not found"),
            other => {
                tracing::error!(error = %other, "Failed to load admin for session");
                AdminAuthRejection::Internal
            }
        })?;

        set_sentry_user(admin.id.as_i32(), admin.email.as_str());
        Ok(Self(CurrentAdmin::from(admin)))
    }
}

/// Extractor that requires an authenticated super admin.
pub struct RequireSuperAdmin(pub CurrentAdmin);

/// Error returned when super admin authentication is required.
#[derive(Debug)]
pub enum SuperAdminRejection {
    Auth(AdminAuthRejection),
    /// Authenticated, but not a super admin.
    Forbidden,
}

impl IntoResponse for SuperAdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Auth(rejection) => rejection.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Only super admins can access this resource" })),
            )
                .into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = SuperAdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAdminAuth(admin) = RequireAdminAuth::from_request_parts(parts, state)
            .await
            .map_err(SuperAdminRejection::Auth)?;

        if admin.role != AdminRole::SuperAdmin {
            return Err(SuperAdminRejection::Forbidden);
        }

        Ok(Self(admin))
    }
}

/// The session token from the bearer header, else the session cookie.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_token(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    if !auth_value.starts_with("Bearer ") {
        return None;
    }
    let token = auth_value.trim_start_matches("Bearer ").trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value carrying a new session token.
#[must_use]
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    Cookie::build((SESSION_COOKIE, token.to_owned()))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .secure(secure)
        .build()
        .to_string()
}

/// `Set-Cookie` value that removes the session cookie.
#[must_use]
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}
