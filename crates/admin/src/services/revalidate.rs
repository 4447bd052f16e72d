//! Storefront cache revalidation.
//!
//! After a catalog write the storefront is told which page changed so it can
//! drop its cached copy. Delivery is fire-and-forget: a failed ping only
//! leaves the storefront serving stale data until its cache TTL runs out.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;

use crate::config::StorefrontHookConfig;

/// Header carrying the shared secret.
pub const REVALIDATE_SECRET_HEADER: &str = "x-revalidate-secret";

/// Sends revalidation requests to the storefront.
///
/// Disabled (every call a no-op) when no storefront URL is configured.
#[derive(Clone)]
pub struct StorefrontNotifier {
    inner: Option<Arc<NotifierInner>>,
}

struct NotifierInner {
    client: reqwest::Client,
    url: Url,
    secret: SecretString,
}

impl StorefrontNotifier {
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: Option<&StorefrontHookConfig>) -> Result<Self, reqwest::Error> {
        let Some(config) = config else {
            return Ok(Self::disabled());
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            inner: Some(Arc::new(NotifierInner {
                client,
                url: config.revalidate_url.clone(),
                secret: config.secret.clone(),
            })),
        })
    }

    #[must_use]
    pub const fn disabled() -> Self {
        Self { inner: None }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Ask the storefront to revalidate `path` in the background.
    pub fn notify(&self, path: &'static str) {
        let Some(inner) = self.inner.clone() else {
            return;
        };

        tokio::spawn(async move {
            let result = inner
                .client
                .post(inner.url.clone())
                .header(REVALIDATE_SECRET_HEADER, inner.secret.expose_secret())
                .json(&json!({ "path": path }))
                .send()
                .await
                .and_then(reqwest::Response::error_for_status);

            match result {
                Ok(_) => tracing::debug!(path, "Storefront revalidated"),
                Err(e) => tracing::warn!(path, error = %e, "Storefront revalidation failed"),
            }
        });
    }
}

impl std::fmt::Debug for StorefrontNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontNotifier")
            .field("url", &self.inner.as_ref().map(|i| i.url.as_str()))
            .finish_non_exhaustive()
    }
}
