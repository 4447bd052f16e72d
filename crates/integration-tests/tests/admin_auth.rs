//! Admin authentication against a real database.
//!
//! Skipped unless `TEST_DATABASE_URL` is set.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use dondra_admin::db::AdminUserRepository;
use dondra_admin::services::TokenService;
use dondra_admin::services::auth::TokenPurpose;
use dondra_core::{AdminRole, Email};
use dondra_integration_tests::{TEST_JWT_SECRET, TEST_PASSWORD, TestContext, request, send};
use secrecy::SecretString;

#[tokio::test]
async fn test_login_and_validate() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let email = ctx.create_admin(AdminRole::Admin).await;

    let (status, body) = send(
        &ctx.admin,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(&json!({ "email": email, "password": "wrong-password" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, _) = send(
        &ctx.admin,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(&json!({ "email": "nobody@dondralanka.lk", "password": TEST_PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = ctx.login(&email).await;
    let (status, body) = ctx
        .admin_call("GET", "/api/auth/validate", &token, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_requires_super_admin() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let admin = ctx.create_admin(AdminRole::Admin).await;
    let token = ctx.login(&admin).await;

    let new_email = format!("new-{}@dondralanka.lk", uuid::Uuid::new_v4().simple());
    let body = json!({ "name": "New", "email": new_email, "password": TEST_PASSWORD });
    let (status, _) = ctx
        .admin_call("POST", "/api/auth/register", &token, Some(&body))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let super_admin = ctx.create_admin(AdminRole::SuperAdmin).await;
    let token = ctx.login(&super_admin).await;

    let (status, created) = ctx
        .admin_call("POST", "/api/auth/register", &token, Some(&body))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["user"]["email"], new_email);
    assert_eq!(created["user"]["role"], "admin");

    let (status, dup) = ctx
        .admin_call("POST", "/api/auth/register", &token, Some(&body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(dup["error"], "Email already registered");
}

#[tokio::test]
async fn test_password_reset() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let email = ctx.create_admin(AdminRole::Admin).await;
    let user = AdminUserRepository::new(&ctx.pool)
        .get_by_email(&Email::parse(&email).unwrap())
        .await
        .unwrap()
        .unwrap();
    let reset = TokenService::new(SecretString::from(TEST_JWT_SECRET))
        .issue(user.id, user.role, TokenPurpose::PasswordReset)
        .unwrap();

    let (status, body) = send(
        &ctx.admin,
        request(
            "POST",
            "/api/auth/reset-password",
            None,
            Some(&json!({ "token": reset, "password": "fresh-seer-fish" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(
        &ctx.admin,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(&json!({ "email": email, "password": "fresh-seer-fish" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Unknown addresses get the same answer without an email being sent
    let (status, _) = send(
        &ctx.admin,
        request(
            "POST",
            "/api/auth/forgot-password",
            None,
            Some(&json!({ "email": "nobody@dondralanka.lk" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_forgot_password_without_smtp_fails_for_known_email() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let email = ctx.create_admin(AdminRole::Admin).await;

    let (status, body) = send(
        &ctx.admin,
        request(
            "POST",
            "/api/auth/forgot-password",
            None,
            Some(&json!({ "email": email })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_deleted_admin_loses_session() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let email = ctx.create_admin(AdminRole::Admin).await;
    let token = ctx.login(&email).await;

    sqlx::query("DELETE FROM admin.admin_user WHERE email = $1")
        .bind(&email)
        .execute(&ctx.pool)
        .await
        .unwrap();

    let (status, _) = ctx.admin_call("GET", "/api/products", &token, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
