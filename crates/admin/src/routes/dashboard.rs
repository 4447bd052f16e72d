//! Dashboard summary.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Serialize;

use dondra_core::Product;

use crate::db::{HotDealRepository, NewsBannerRepository, ProductRepository};
use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

const RECENT_LIMIT: i64 = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: i64,
    /// Deals live right now, not merely marked active.
    pub active_hot_deals: i64,
    pub active_news_banners: i64,
    pub recent_products: Vec<Product>,
}

pub async fn show(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>> {
    let now = Utc::now();
    let products = ProductRepository::new(state.pool());
    let hot_deals = HotDealRepository::new(state.pool());
    let news_banners = NewsBannerRepository::new(state.pool());

    let (total_products, active_hot_deals, active_news_banners, recent_products) = tokio::try_join!(
        products.count(),
        hot_deals.count_live(now),
        news_banners.count_live(now),
        products.recent(RECENT_LIMIT),
    )?;

    Ok(Json(DashboardStats {
        total_products,
        active_hot_deals,
        active_news_banners,
        recent_products,
    }))
}
