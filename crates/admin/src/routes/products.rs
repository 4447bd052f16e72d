//! Product CRUD.

use axum::{extract::State, http::StatusCode};

use dondra_core::{Product, ProductId};

use super::{Deleted, not_found};
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::extract::{Json, Path};
use crate::middleware::RequireAdminAuth;
use crate::models::ProductInput;
use crate::models::catalog::ProductStatusInput;
use crate::state::AppState;

/// Revalidation path for product pages.
const PRODUCTS_PATH: &str = "/products";

const RECENT_LIMIT: i64 = 5;

pub async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(ProductRepository::new(state.pool()).list().await?))
}

pub async fn recent(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(
        ProductRepository::new(state.pool())
            .recent(RECENT_LIMIT)
            .await?,
    ))
}

pub async fn show(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let draft = input.validate()?;
    let product = ProductRepository::new(state.pool()).create(&draft).await?;

    tracing::info!(admin_id = %admin.id, product_id = %product.id, "Product created");
    state.storefront().notify(PRODUCTS_PATH);
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>> {
    let draft = input.validate()?;
    let product = ProductRepository::new(state.pool())
        .update(id, &draft)
        .await
        .map_err(not_found("Product not found"))?;

    tracing::info!(admin_id = %admin.id, product_id = %id, "Product updated");
    state.storefront().notify(PRODUCTS_PATH);
    Ok(Json(product))
}

pub async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(input): Json<ProductStatusInput>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .set_status(id, input.status)
        .await
        .map_err(not_found("Product not found"))?;

    tracing::info!(admin_id = %admin.id, product_id = %id, status = ?input.status, "Product status changed");
    state.storefront().notify(PRODUCTS_PATH);
    Ok(Json(product))
}

pub async fn destroy(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Deleted>> {
    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found("Product not found"))?;

    tracing::info!(admin_id = %admin.id, product_id = %id, "Product deleted");
    state.storefront().notify(PRODUCTS_PATH);
    Ok(Json(Deleted::new("Product deleted successfully")))
}
