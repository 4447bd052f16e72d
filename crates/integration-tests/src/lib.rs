//! Integration tests for Dondra Lanka.
//!
//! Drives the admin and storefront routers in-process against a real
//! `PostgreSQL` database.
//!
//! # Running Tests
//!
//! ```bash
//! TEST_DATABASE_URL=postgres://localhost/dondra_test cargo test -p dondra-integration-tests
//! ```
//!
//! Without `TEST_DATABASE_URL` every database test returns early and passes.
//! Tests share the database, so each one works with its own uniquely named
//! rows.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use secrecy::SecretString;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use url::Url;

use dondra_admin::config::{AdminConfig, CloudinaryConfig};
use dondra_admin::db::AdminUserRepository;
use dondra_admin::services::auth::hash_password;
use dondra_core::{AdminRole, Email};
use dondra_storefront::config::StorefrontConfig;

pub const TEST_JWT_SECRET: &str = "Qm8#tR2$wZ5!nB7@kL3^vX9&pD4*hF6%";
pub const TEST_REVALIDATE_SECRET: &str = "kT9#vQ2!mZ7@pL4$wX8&nR3*bY6^cJ1%";
pub const TEST_PASSWORD: &str = "prawns-and-sprats";

/// Both apps wired to the test database.
pub struct TestContext {
    pub pool: PgPool,
    pub admin: Router,
    pub storefront: Router,
}

impl TestContext {
    /// Connect and migrate, or `None` when `TEST_DATABASE_URL` is unset.
    pub async fn new() -> Option<Self> {
        Self::with_image_host(Url::parse("http://127.0.0.1:9").unwrap()).await
    }

    /// As [`TestContext::new`], with uploads sent to `image_host`.
    pub async fn with_image_host(image_host: Url) -> Option<Self> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .unwrap();
        sqlx::migrate!("../admin/migrations").run(&pool).await.unwrap();

        let admin_state =
            dondra_admin::state::AppState::new(admin_config(&url, image_host), pool.clone())
                .unwrap();
        let storefront_state =
            dondra_storefront::state::AppState::new(storefront_config(&url), pool.clone());

        Some(Self {
            admin: dondra_admin::app(admin_state),
            storefront: dondra_storefront::app(storefront_state),
            pool,
        })
    }

    /// Insert an admin with [`TEST_PASSWORD`] and a unique email.
    pub async fn create_admin(&self, role: AdminRole) -> String {
        let email = format!("admin-{}@dondralanka.lk", uuid::Uuid::new_v4().simple());
        AdminUserRepository::new(&self.pool)
            .create(
                &Email::parse(&email).unwrap(),
                "Test Admin",
                role,
                &hash_password(TEST_PASSWORD).unwrap(),
            )
            .await
            .unwrap();
        email
    }

    /// Log in through the API and return the session token.
    pub async fn login(&self, email: &str) -> String {
        let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD });
        let (status, json) = send(
            &self.admin,
            request("POST", "/api/auth/login", None, Some(&body)),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "login failed: {json}");
        json["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_call(
        &self,
        method: &str,
        uri: &str,
        token: &str,
        body: Option<&Value>,
    ) -> (StatusCode, Value) {
        send(&self.admin, request(method, uri, Some(token), body)).await
    }

    pub async fn storefront_get(&self, uri: &str) -> (StatusCode, Value) {
        send(&self.storefront, request("GET", uri, None, None)).await
    }
}

/// Build a JSON request. Carries a client IP for the rate limiters.
pub fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", "198.51.100.20");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, json_body(response).await)
}

/// Parse a JSON body; non-JSON bodies come back as a string value.
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

fn admin_config(database_url: &str, image_host: Url) -> AdminConfig {
    AdminConfig {
        database_url: SecretString::from(database_url),
        host: "127.0.0.1".parse().unwrap(),
        port: 3001,
        public_url: Url::parse("https://dondralanka.lk/").unwrap(),
        jwt_secret: SecretString::from(TEST_JWT_SECRET),
        secure_cookies: true,
        cors_origin: None,
        cloudinary: CloudinaryConfig {
            cloud_name: "dondra".to_string(),
            upload_preset: "catalog".to_string(),
            base_url: image_host,
        },
        email: None,
        storefront: None,
        json_logs: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

fn storefront_config(database_url: &str) -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from(database_url),
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        revalidate_secret: Some(SecretString::from(TEST_REVALIDATE_SECRET)),
        cors_origin: None,
        cache_ttl: Duration::from_secs(60),
        json_logs: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}
