//! News banner CRUD.

use axum::{extract::State, http::StatusCode};

use dondra_core::{NewsBanner, NewsBannerId};

use super::{Deleted, not_found};
use crate::db::NewsBannerRepository;
use crate::error::{AppError, Result};
use crate::extract::{Json, Path};
use crate::middleware::RequireAdminAuth;
use crate::models::NewsBannerInput;
use crate::state::AppState;

const NEWS_BANNERS_PATH: &str = "/news-banners";

pub async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<NewsBanner>>> {
    Ok(Json(NewsBannerRepository::new(state.pool()).list().await?))
}

pub async fn show(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<NewsBannerId>,
) -> Result<Json<NewsBanner>> {
    NewsBannerRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("News banner not found".to_string()))
}

pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<NewsBannerInput>,
) -> Result<(StatusCode, Json<NewsBanner>)> {
    let draft = input.validate()?;
    let banner = NewsBannerRepository::new(state.pool()).create(&draft).await?;

    tracing::info!(admin_id = %admin.id, news_banner_id = %banner.id, "News banner created");
    state.storefront().notify(NEWS_BANNERS_PATH);
    Ok((StatusCode::CREATED, Json(banner)))
}

pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<NewsBannerId>,
    Json(input): Json<NewsBannerInput>,
) -> Result<Json<NewsBanner>> {
    let draft = input.validate()?;
    let banner = NewsBannerRepository::new(state.pool())
        .update(id, &draft)
        .await
        .map_err(not_found("News banner not found"))?;

    tracing::info!(admin_id = %admin.id, news_banner_id = %id, "News banner updated");
    state.storefront().notify(NEWS_BANNERS_PATH);
    Ok(Json(banner))
}

pub async fn destroy(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<NewsBannerId>,
) -> Result<Json<Deleted>> {
    NewsBannerRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found("News banner not found"))?;

    tracing::info!(admin_id = %admin.id, news_banner_id = %id, "News banner deleted");
    state.storefront().notify(NEWS_BANNERS_PATH);
    Ok(Json(Deleted::new("News banner deleted successfully")))
}
