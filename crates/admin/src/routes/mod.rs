//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! # Auth (* = rate limited)
//! POST   /api/auth/login               * - Password login, sets session cookie
//! POST   /api/auth/logout                - Clear session cookie
//! GET    /api/auth/validate              - Current admin for a session token
//! POST   /api/auth/register            * - Create an admin (super admin only)
//! POST   /api/auth/forgot-password     * - Email a reset link
//! POST   /api/auth/validate-reset-token* - Check a reset link
//! POST   /api/auth/reset-password      * - Set a new password
//!
//! # Catalog (authenticated)
//! GET    /api/products                   - All products
//! POST   /api/products                   - Create product
//! GET    /api/products/recent            - Newest 5
//! GET    /api/products/{id}              - Product detail
//! PUT    /api/products/{id}              - Replace product
//! DELETE /api/products/{id}              - Delete product
//! PATCH  /api/products/{id}/status       - Change stock status
//!
//! GET    /api/categories                 - All categories
//! POST   /api/categories                 - Create category
//! PUT    /api/categories/{id}            - Update category
//! DELETE /api/categories/{id}            - Delete category
//!
//! GET    /api/hot-deals                  - All deals with product and countdown
//! POST   /api/hot-deals                  - Create deal
//! GET    /api/hot-deals/{id}             - Deal detail
//! PUT    /api/hot-deals/{id}             - Replace deal
//! DELETE /api/hot-deals/{id}             - Delete deal
//!
//! GET    /api/news-banners               - All banners
//! POST   /api/news-banners               - Create banner
//! GET    /api/news-banners/{id}          - Banner detail
//! PUT    /api/news-banners/{id}          - Replace banner
//! DELETE /api/news-banners/{id}          - Delete banner
//!
//! GET    /api/price-list                 - All price lists
//! POST   /api/price-list                 - Create price list
//! POST   /api/price-list/upload          - Publish a new active price list
//! DELETE /api/price-list/{id}            - Delete price list
//!
//! POST   /api/uploads/image              - Upload an image to the image host
//! GET    /api/dashboard                  - Counts and recent products
//! ```

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod hot_deals;
pub mod news_banners;
pub mod price_list;
pub mod products;
pub mod uploads;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
};
use serde::Serialize;

use crate::db::RepositoryError;
use crate::error::AppError;
use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Largest accepted image upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Room for multipart boundaries and part headers around the file.
pub(crate) const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Body returned by delete endpoints.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub success: bool,
    pub message: &'static str,
}

impl Deleted {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

/// Map a missing row to a 404 carrying `message`.
pub(crate) fn not_found(message: &'static str) -> impl FnOnce(RepositoryError) -> AppError {
    move |err| match err {
        RepositoryError::NotFound => AppError::NotFound(message.to_string()),
        other => other.into(),
    }
}

/// Auth endpoints. Only the credential and reset-token routes are rate
/// limited; session checks run on every admin page load.
pub fn auth_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/validate-reset-token", post(auth::validate_reset_token))
        .route("/reset-password", post(auth::reset_password))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/logout", post(auth::logout))
        .route("/validate", get(auth::validate))
        .merge(limited)
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/recent", get(products::recent))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/{id}/status", patch(products::update_status))
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route(
            "/{id}",
            axum::routing::put(categories::update).delete(categories::destroy),
        )
}

pub fn hot_deal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(hot_deals::index).post(hot_deals::create))
        .route(
            "/{id}",
            get(hot_deals::show)
                .put(hot_deals::update)
                .delete(hot_deals::destroy),
        )
}

pub fn news_banner_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(news_banners::index).post(news_banners::create))
        .route(
            "/{id}",
            get(news_banners::show)
                .put(news_banners::update)
                .delete(news_banners::destroy),
        )
}

pub fn price_list_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(price_list::index).post(price_list::create))
        .route("/upload", post(price_list::upload))
        .route("/{id}", axum::routing::delete(price_list::destroy))
}

/// All `/api` routes.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/hot-deals", hot_deal_routes())
        .nest("/news-banners", news_banner_routes())
        .nest("/price-list", price_list_routes())
        .route(
            "/uploads/image",
            post(uploads::image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
        .route("/dashboard", get(dashboard::show));

    Router::new().nest("/api", api)
}
