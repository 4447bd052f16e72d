//! Category CRUD. Slugs are derived from names on every write.

use axum::{extract::State, http::StatusCode};

use dondra_core::{Category, CategoryId};

use super::{Deleted, not_found};
use crate::db::CategoryRepository;
use crate::error::Result;
use crate::extract::{Json, Path};
use crate::middleware::RequireAdminAuth;
use crate::models::CategoryInput;
use crate::state::AppState;

const CATEGORIES_PATH: &str = "/categories";

pub async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>> {
    Ok(Json(CategoryRepository::new(state.pool()).list().await?))
}

pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>)> {
    let draft = input.validate()?;
    let category = CategoryRepository::new(state.pool()).create(&draft).await?;

    tracing::info!(admin_id = %admin.id, slug = %category.slug, "Category created");
    state.storefront().notify(CATEGORIES_PATH);
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<Category>> {
    let draft = input.validate()?;
    let category = CategoryRepository::new(state.pool())
        .update(id, &draft)
        .await
        .map_err(not_found("Category not found"))?;

    tracing::info!(admin_id = %admin.id, category_id = %id, "Category updated");
    state.storefront().notify(CATEGORIES_PATH);
    Ok(Json(category))
}

pub async fn destroy(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Deleted>> {
    CategoryRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found("Category not found"))?;

    tracing::info!(admin_id = %admin.id, category_id = %id, "Category deleted");
    state.storefront().notify(CATEGORIES_PATH);
    Ok(Json(Deleted::new("Category deleted successfully")))
}
