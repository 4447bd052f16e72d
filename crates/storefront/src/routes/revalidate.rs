//! Cache revalidation requested by the back office after catalog edits.

use axum::{extract::State, http::HeaderMap};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::state::AppState;

pub const REVALIDATE_SECRET_HEADER: &str = "x-revalidate-secret";

#[derive(Debug, Deserialize)]
pub struct RevalidateRequest {
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RevalidateResponse {
    pub revalidated: bool,
    /// Milliseconds since the Unix epoch.
    pub now: i64,
}

pub async fn revalidate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RevalidateRequest>,
) -> Result<Json<RevalidateResponse>> {
    let presented = headers
        .get(REVALIDATE_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !state.config().revalidate_secret_matches(presented) {
        return Err(AppError::Unauthorized("Invalid revalidation secret".to_string()));
    }

    let path = body
        .path
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Path parameter is required".to_string()))?;

    let scope = state.catalog().revalidate(&path).await;
    tracing::info!(%path, ?scope, "Catalog cache revalidated");

    Ok(Json(RevalidateResponse {
        revalidated: true,
        now: Utc::now().timestamp_millis(),
    }))
}
