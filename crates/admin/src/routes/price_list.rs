//! Price list uploads.
//!
//! Publishing an active price list retires the previous one.

use axum::{extract::State, http::StatusCode};

use dondra_core::{AdminUserId, PriceList, PriceListId, PriceListStatus};

use super::{Deleted, not_found};
use crate::db::PriceListRepository;
use crate::error::Result;
use crate::extract::{Json, Path};
use crate::middleware::RequireAdminAuth;
use crate::models::PriceListInput;
use crate::state::AppState;

const PRICE_LIST_PATH: &str = "/price-list";

pub async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<PriceList>>> {
    Ok(Json(PriceListRepository::new(state.pool()).list().await?))
}

pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<PriceListInput>,
) -> Result<(StatusCode, Json<PriceList>)> {
    let (image_url, status) = input.validate()?;
    publish(&state, admin.id, &image_url, status).await
}

/// Publish a new price list image. Always active; any `status` is ignored.
pub async fn upload(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<PriceListInput>,
) -> Result<(StatusCode, Json<PriceList>)> {
    let (image_url, _) = input.validate()?;
    publish(&state, admin.id, &image_url, PriceListStatus::Active).await
}

pub async fn destroy(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<PriceListId>,
) -> Result<Json<Deleted>> {
    PriceListRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found("Price list not found"))?;

    tracing::info!(admin_id = %admin.id, price_list_id = %id, "Price list deleted");
    state.storefront().notify(PRICE_LIST_PATH);
    Ok(Json(Deleted::new("Price list deleted successfully")))
}

async fn publish(
    state: &AppState,
    admin_id: AdminUserId,
    image_url: &str,
    status: PriceListStatus,
) -> Result<(StatusCode, Json<PriceList>)> {
    let list = PriceListRepository::new(state.pool())
        .create(image_url, status)
        .await?;

    tracing::info!(%admin_id, price_list_id = %list.id, ?status, "Price list created");
    state.storefront().notify(PRICE_LIST_PATH);
    Ok((StatusCode::CREATED, Json(list)))
}
