use axum::{Json, extract::State};

use dondra_core::PriceList;

use crate::error::Result;
use crate::state::AppState;

/// The price list to display, or `null` when none has been uploaded.
pub async fn active(State(state): State<AppState>) -> Result<Json<Option<PriceList>>> {
    Ok(Json(state.catalog().current_price_list().await?))
}
