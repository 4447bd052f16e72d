//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use crate::config::AdminConfig;
use crate::services::{
    AuthService, CloudinaryClient, EmailService, ImageHostError, StorefrontNotifier, TokenService,
};

/// Failure to build the external clients at startup.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("image host client: {0}")]
    ImageHost(#[from] ImageHostError),

    #[error("SMTP transport: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("storefront notifier: {0}")]
    Notifier(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    tokens: TokenService,
    email: Option<EmailService>,
    images: CloudinaryClient,
    storefront: StorefrontNotifier,
}

impl AppState {
    /// # Errors
    ///
    /// Returns `StateError` if an external client cannot be configured.
    pub fn new(config: AdminConfig, pool: PgPool) -> Result<Self, StateError> {
        let tokens = TokenService::new(config.jwt_secret.clone());
        let email = config.email.as_ref().map(EmailService::new).transpose()?;
        let images = CloudinaryClient::new(&config.cloudinary)?;
        let storefront = StorefrontNotifier::new(config.storefront.as_ref())?;

        if email.is_none() {
            tracing::warn!("SMTP not configured, password reset emails are disabled");
        }
        if !storefront.is_enabled() {
            tracing::warn!("Storefront revalidation hook not configured, edits show after cache expiry");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                email,
                images,
                storefront,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Auth service borrowing this state's pool and token keys.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.inner.pool, &self.inner.tokens)
    }

    /// `None` when SMTP is not configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }

    #[must_use]
    pub fn images(&self) -> &CloudinaryClient {
        &self.inner.images
    }

    #[must_use]
    pub fn storefront(&self) -> &StorefrontNotifier {
        &self.inner.storefront
    }
}
