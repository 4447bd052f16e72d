//! Image uploads, proxied to the image host.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use serde::Serialize;

use super::MAX_UPLOAD_BYTES;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Multipart field holding the image.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Accept one image in the `file` field and return its hosted URL.
pub async fn image(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let upload = read_image(multipart).await?;
    let url = state
        .images()
        .upload(upload.bytes, &upload.filename, &upload.content_type)
        .await?;

    tracing::info!(admin_id = %admin.id, filename = %upload.filename, "Image uploaded");
    Ok(Json(UploadResponse { url }))
}

struct ImageUpload {
    bytes: Vec<u8>,
    filename: String,
    content_type: String,
}

/// Pull the first `file` field out of the form, checking type and size.
async fn read_image(mut multipart: Multipart) -> Result<ImageUpload> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_image(&content_type) {
            return Err(AppError::BadRequest(
                "Only image files are allowed".to_string(),
            ));
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        check_size(bytes.len())?;

        return Ok(ImageUpload {
            bytes: bytes.to_vec(),
            filename,
            content_type,
        });
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}

fn is_image(content_type: &str) -> bool {
    content_type
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
        && content_type.len() > 6
}

fn check_size(len: usize) -> Result<()> {
    if len == 0 {
        return Err(AppError::BadRequest("No file uploaded".to_string()));
    }
    if len > MAX_UPLOAD_BYTES {
        return Err(AppError::PayloadTooLarge(
            "File size must be 5MB or less".to_string(),
        ));
    }
    Ok(())
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File size must be 5MB or less".to_string())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, extract::DefaultBodyLimit, http::Request, routing::post};
    use tower::ServiceExt;

    use super::*;
    use crate::routes::MULTIPART_OVERHEAD_BYTES;

    const BOUNDARY: &str = "dondra-boundary";

    /// Echoes what `read_image` accepted, behind the same body limit as the
    /// real route.
    fn test_app() -> Router {
        Router::new()
            .route(
                "/upload",
                post(|multipart: Multipart| async move {
                    let upload = read_image(multipart).await?;
                    Ok::<_, AppError>(Json(serde_json::json!({
                        "size": upload.bytes.len(),
                        "filename": upload.filename,
                        "contentType": upload.content_type,
                    })))
                }),
            )
            .layer(DefaultBodyLimit::max(
                MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES,
            ))
    }

    fn form(field: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"catch.jpg\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn send(body: Vec<u8>) -> (StatusCode, serde_json::Value) {
        let response = test_app()
            .oneshot(
                Request::post("/upload")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_accepts_image() {
        let (status, body) = send(form("file", "image/jpeg", b"jpeg")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["size"], 4);
        assert_eq!(body["filename"], "catch.jpg");
        assert_eq!(body["contentType"], "image/jpeg");
    }

    #[tokio::test]
    async fn test_rejects_non_image() {
        let (status, body) = send(form("file", "application/pdf", b"%PDF")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Only image files are allowed");
    }

    #[tokio::test]
    async fn test_requires_file_field() {
        let (status, body) = send(form("avatar", "image/png", b"png")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file uploaded");
    }

    #[tokio::test]
    async fn test_rejects_oversized_file() {
        let just_over = vec![0; MAX_UPLOAD_BYTES + 1];
        let (status, body) = send(form("file", "image/png", &just_over)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "File size must be 5MB or less");

        let too_big = vec![0; MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES + 1];
        let (status, body) = send(form("file", "image/png", &too_big)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "File size must be 5MB or less");
    }

    #[test]
    fn test_is_image() {
        assert!(is_image("image/png"));
        assert!(is_image("IMAGE/JPEG"));
        assert!(!is_image("image/"));
        assert!(!is_image("application/pdf"));
        assert!(!is_image(""));
    }

    #[test]
    fn test_check_size() {
        assert!(check_size(1).is_ok());
        assert!(check_size(MAX_UPLOAD_BYTES).is_ok());
        assert!(matches!(
            check_size(MAX_UPLOAD_BYTES + 1),
            Err(AppError::PayloadTooLarge(_))
        ));
        assert!(matches!(check_size(0), Err(AppError::BadRequest(_))));
    }
}
