//! Hot deals and news banners.
//!
//! Only promotions live at request time are listed.

use axum::{Json, extract::State};
use chrono::Utc;

use dondra_core::{HotDealId, HotDealWithProduct, NewsBanner};

use crate::error::{AppError, Result};
use crate::extract::Path;
use crate::state::AppState;

pub async fn hot_deals(State(state): State<AppState>) -> Result<Json<Vec<HotDealWithProduct>>> {
    Ok(Json(state.catalog().live_hot_deals(Utc::now()).await?))
}

/// A single deal by ID, live or not, so shared links still resolve.
pub async fn hot_deal(
    State(state): State<AppState>,
    Path(id): Path<HotDealId>,
) -> Result<Json<HotDealWithProduct>> {
    state
        .catalog()
        .hot_deal(id, Utc::now())
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Hot deal not found".to_string()))
}

pub async fn news_banners(State(state): State<AppState>) -> Result<Json<Vec<NewsBanner>>> {
    Ok(Json(state.catalog().live_news_banners(Utc::now()).await?))
}
