//! Dondra Lanka back office library.
//!
//! JSON API for managing the catalog: admin authentication, product,
//! category, hot deal, news banner and price list CRUD, image uploads and
//! dashboard counts. Owns the database migrations.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::{Router, middleware as axum_mw, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::config::AdminConfig;
use crate::state::AppState;

/// Build the full admin router with its middleware stack.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(axum_mw::from_fn(middleware::security_headers_middleware))
        .layer(cors)
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Cross-origin access for the admin frontend.
///
/// The session cookie needs credentialed requests, which rule out a
/// wildcard origin: without `ADMIN_CORS_ORIGIN` only same-origin calls work.
fn cors_layer(config: &AdminConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match config
        .cors_origin
        .as_deref()
        .and_then(|origin| HeaderValue::from_str(origin).ok())
    {
        Some(origin) => base.allow_origin(origin).allow_credentials(true),
        None => base,
    }
}

/// Liveness: the process is up. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness: 503 until the database answers.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::tests::test_config;
    use crate::services::auth::TokenPurpose;
    use crate::services::TokenService;
    use dondra_core::{AdminRole, AdminUserId};

    fn test_app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/dondra_test")
            .unwrap();
        app(AppState::new(test_config(), pool).unwrap())
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .header("x-forwarded-for", "203.0.113.9")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn token(purpose: TokenPurpose) -> String {
        TokenService::new(test_config().jwt_secret)
            .issue(AdminUserId::new(1), AdminRole::Admin, purpose)
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()["cache-control"], "no-store");
    }

    #[tokio::test]
    async fn test_catalog_requires_token() {
        let response = test_app()
            .oneshot(Request::get("/api/products").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "No token provided");
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let response = test_app()
            .oneshot(
                Request::get("/api/dashboard")
                    .header("authorization", "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_reset_token_is_not_a_session() {
        let response = test_app()
            .oneshot(
                Request::get("/api/auth/validate")
                    .header("x-forwarded-for", "203.0.113.9")
                    .header(
                        "cookie",
                        format!("token={}", token(TokenPurpose::PasswordReset)),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_session_token_is_not_a_reset_token() {
        let body = format!(r#"{{"token":"{}"}}"#, token(TokenPurpose::Session));
        let response = test_app()
            .oneshot(json_post("/api/auth/validate-reset-token", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_validate_reset_token() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(json_post("/api/auth/validate-reset-token", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = format!(r#"{{"token":"{}"}}"#, token(TokenPurpose::PasswordReset));
        let response = app
            .oneshot(json_post("/api/auth/validate-reset-token", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["valid"], true);
    }

    #[tokio::test]
    async fn test_reset_password_rejects_short_password() {
        let body = format!(
            r#"{{"token":"{}","password":"short"}}"#,
            token(TokenPurpose::PasswordReset)
        );
        let response = test_app()
            .oneshot(json_post("/api/auth/reset-password", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "Password must be at least 8 characters long"
        );
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let response = test_app()
            .oneshot(json_post("/api/auth/login", r#"{"email":"a@b.lk"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let response = test_app()
            .oneshot(json_post("/api/auth/logout", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()["set-cookie"].to_str().unwrap();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_session_check_is_not_rate_limited() {
        let app = test_app();

        for _ in 0..10 {
            let response = app
                .clone()
                .oneshot(
                    Request::get("/api/auth/validate")
                        .header("x-forwarded-for", "203.0.113.9")
                        .header("authorization", "Bearer not.a.token")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_json_error() {
        let response = test_app()
            .oneshot(json_post("/api/auth/login", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_auth_endpoints_are_rate_limited() {
        let app = test_app();

        for _ in 0..5 {
            let response = app
                .clone()
                .oneshot(json_post("/api/auth/forgot-password", "{}"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let response = app
            .oneshot(json_post("/api/auth/forgot-password", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
