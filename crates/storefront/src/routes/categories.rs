use axum::{Json, extract::State};

use dondra_core::Category;

use crate::error::Result;
use crate::state::AppState;

/// Active categories, sorted by name.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.catalog().categories().await?))
}
