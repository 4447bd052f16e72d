//! Product catalog routes.

use axum::{Json, extract::State};
use serde::Deserialize;

use dondra_core::{Product, ProductId};

use crate::error::{AppError, Result};
use crate::extract::{Path, Query};
use crate::services::catalog::CATEGORY_DEFAULT_LIMIT;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub limit: Option<i64>,
}

pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().products().await?))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    state
        .catalog()
        .product(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

pub async fn related(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().related(id).await?))
}

pub async fn recent(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().recent().await?))
}

pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().featured().await?))
}

pub async fn by_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<Product>>> {
    let limit = query.limit.unwrap_or(CATEGORY_DEFAULT_LIMIT);
    Ok(Json(state.catalog().in_category(&slug, limit).await?))
}
