//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/products                  - All products, newest first
//! GET  /api/products/recent           - Newest 5
//! GET  /api/products/featured         - Up to 3 in-stock, featured first
//! GET  /api/products/category/{slug}  - Category page (?limit=, default 4)
//! GET  /api/products/{id}             - Product detail
//! GET  /api/products/{id}/related     - Same category, excluding itself
//!
//! GET  /api/categories                - Active categories by name
//!
//! GET  /api/hot-deals                 - Live hot deals with countdown
//! GET  /api/hot-deals/{id}            - One hot deal, any status
//! GET  /api/news-banners              - Live news banners
//! GET  /api/price-list/active         - Price list to display (or null)
//!
//! POST /api/revalidate                - Drop cached entries for a page path
//! ```

pub mod categories;
pub mod price_list;
pub mod products;
pub mod promotions;
pub mod revalidate;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::revalidate_rate_limiter;
use crate::state::AppState;

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/recent", get(products::recent))
        .route("/featured", get(products::featured))
        .route("/category/{slug}", get(products::by_category))
        .route("/{id}", get(products::show))
        .route("/{id}/related", get(products::related))
}

pub fn promotion_routes() -> Router<AppState> {
    Router::new()
        .route("/hot-deals", get(promotions::hot_deals))
        .route("/hot-deals/{id}", get(promotions::hot_deal))
        .route("/news-banners", get(promotions::news_banners))
}

/// All `/api` routes.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/products", product_routes())
        .route("/categories", get(categories::index))
        .merge(promotion_routes())
        .route("/price-list/active", get(price_list::active))
        .route(
            "/revalidate",
            post(revalidate::revalidate).layer(revalidate_rate_limiter()),
        );

    Router::new().nest("/api", api)
}
