//! Cloudinary image host client.
//!
//! Uploads go through an unsigned upload preset, so no API secret is held
//! here. The host answers with the public `secure_url` of the stored image.
//!
//! # API Reference
//!
//! - Endpoint: `POST {base}/v1_1/{cloud_name}/image/upload`
//! - Body: multipart form with `file` and `upload_preset`
//! - Errors: `{"error": {"message": "..."}}`

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::CloudinaryConfig;

/// Errors that can occur when uploading to the image host.
#[derive(Debug, Error)]
pub enum ImageHostError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Host returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Cloudinary upload client.
#[derive(Clone)]
pub struct CloudinaryClient {
    inner: Arc<CloudinaryClientInner>,
}

struct CloudinaryClientInner {
    client: reqwest::Client,
    upload_url: Url,
    upload_preset: String,
}

impl CloudinaryClient {
    /// # Errors
    ///
    /// Returns error if the upload URL cannot be formed or the HTTP client
    /// fails to build.
    pub fn new(config: &CloudinaryConfig) -> Result<Self, ImageHostError> {
        let upload_url = upload_url(&config.base_url, &config.cloud_name)?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            inner: Arc::new(CloudinaryClientInner {
                client,
                upload_url,
                upload_preset: config.upload_preset.clone(),
            }),
        })
    }

    /// Upload an image and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns `ImageHostError::Api` if the host rejects the upload, or
    /// `Http`/`Parse` if it cannot be reached or answers unexpectedly.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<String, ImageHostError> {
        let size = bytes.len();
        let file = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = Form::new()
            .part("file", file)
            .text("upload_preset", self.inner.upload_preset.clone());

        let response = self
            .inner
            .client
            .post(self.inner.upload_url.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_error(status.as_u16(), &body));
        }

        let uploaded: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| ImageHostError::Parse(format!("Failed to parse response: {e}")))?;
        tracing::info!(size, url = %uploaded.secure_url, "Image uploaded");
        Ok(uploaded.secure_url)
    }
}

impl std::fmt::Debug for CloudinaryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryClient")
            .field("upload_url", &self.inner.upload_url.as_str())
            .finish_non_exhaustive()
    }
}

fn upload_url(base: &Url, cloud_name: &str) -> Result<Url, ImageHostError> {
    let base = base.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/v1_1/{cloud_name}/image/upload"))
        .map_err(|e| ImageHostError::Parse(format!("Invalid upload URL: {e}")))
}

fn parse_error(status: u16, body: &str) -> ImageHostError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                body.to_string()
            }
        });
    ImageHostError::Api { status, message }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{body_string_contains, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> CloudinaryClient {
        CloudinaryClient::new(&CloudinaryConfig {
            cloud_name: "dondra".to_string(),
            upload_preset: "catalog".to_string(),
            base_url: Url::parse(&server.uri()).unwrap(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_upload_sends_file_and_preset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/dondra/image/upload"))
            .and(header_regex("content-type", "^multipart/form-data"))
            .and(body_string_contains(r#"name="file"; filename="balaya.jpg""#))
            .and(body_string_contains(r#"name="upload_preset""#))
            .and(body_string_contains("catalog"))
            .and(body_string_contains("jpeg-bytes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "public_id": "balaya",
                "secure_url": "https://res.cloudinary.com/dondra/image/upload/balaya.jpg",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = client_for(&server)
            .upload(b"jpeg-bytes".to_vec(), "balaya.jpg", "image/jpeg")
            .await
            .unwrap();
        assert_eq!(url, "https://res.cloudinary.com/dondra/image/upload/balaya.jpg");
    }

    #[tokio::test]
    async fn test_upload_surfaces_host_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "message": "Upload preset not found" }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .upload(b"png".to_vec(), "a.png", "image/png")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ImageHostError::Api { status: 400, ref message } if message == "Upload preset not found"
        ));
    }

    #[tokio::test]
    async fn test_upload_rejects_unexpected_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .upload(b"png".to_vec(), "a.png", "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, ImageHostError::Parse(_)));
    }

    #[test]
    fn test_upload_url() {
        let base = Url::parse("https://api.cloudinary.com").unwrap();
        assert_eq!(
            upload_url(&base, "dondra").unwrap().as_str(),
            "https://api.cloudinary.com/v1_1/dondra/image/upload"
        );

        let base = Url::parse("http://127.0.0.1:9/").unwrap();
        assert_eq!(
            upload_url(&base, "dondra").unwrap().as_str(),
            "http://127.0.0.1:9/v1_1/dondra/image/upload"
        );
    }

    #[test]
    fn test_parse_error_body() {
        let err = parse_error(400, r#"{"error":{"message":"Upload preset not found"}}"#);
        assert!(matches!(
            err,
            ImageHostError::Api { status: 400, ref message } if message == "Upload preset not found"
        ));
    }

    #[test]
    fn test_parse_error_falls_back_to_raw_body() {
        let err = parse_error(502, "Bad Gateway");
        assert!(matches!(err, ImageHostError::Api { ref message, .. } if message == "Bad Gateway"));

        let err = parse_error(500, "  ");
        assert!(matches!(err, ImageHostError::Api { ref message, .. } if message == "Unknown error"));
    }
}
