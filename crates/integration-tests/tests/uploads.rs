//! Image upload tests against a mock image host.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dondra_core::AdminRole;
use dondra_integration_tests::{TestContext, send};

const BOUNDARY: &str = "catch-of-the-day";

fn upload_request(token: &str, content_type: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"seer.png\"\r\nContent-Type: {content_type}\r\n\r\npng-bytes\r\n--{BOUNDARY}--\r\n"
    );
    Request::post("/api/uploads/image")
        .header("x-forwarded-for", "198.51.100.20")
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn context(host: &MockServer) -> Option<(TestContext, String)> {
    let ctx = TestContext::with_image_host(Url::parse(&host.uri()).unwrap()).await?;
    let email = ctx.create_admin(AdminRole::Admin).await;
    let token = ctx.login(&email).await;
    Some((ctx, token))
}

#[tokio::test]
async fn test_upload_returns_hosted_url() {
    let host = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/dondra/image/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "secure_url": "https://res.cloudinary.com/dondra/image/upload/seer.png",
        })))
        .expect(1)
        .mount(&host)
        .await;
    let Some((ctx, token)) = context(&host).await else {
        return;
    };

    let (status, body) = send(&ctx.admin, upload_request(&token, "image/png")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["url"],
        "https://res.cloudinary.com/dondra/image/upload/seer.png"
    );
}

#[tokio::test]
async fn test_upload_host_failure_is_bad_gateway() {
    let host = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&host)
        .await;
    let Some((ctx, token)) = context(&host).await else {
        return;
    };

    let (status, body) = send(&ctx.admin, upload_request(&token, "image/png")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Image upload failed");
}

#[tokio::test]
async fn test_upload_never_forwards_non_images() {
    let host = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&host)
        .await;
    let Some((ctx, token)) = context(&host).await else {
        return;
    };

    let (status, body) = send(&ctx.admin, upload_request(&token, "text/plain")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Only image files are allowed");
}

#[tokio::test]
async fn test_upload_requires_auth() {
    let host = MockServer::start().await;
    let Some((ctx, _)) = context(&host).await else {
        return;
    };

    let (status, _) = send(&ctx.admin, upload_request("not-a-token", "image/png")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
