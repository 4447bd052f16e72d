//! Hot deal CRUD.
//!
//! Every deal is returned joined with its product and a countdown label
//! computed at request time.

use axum::{extract::State, http::StatusCode};
use chrono::Utc;

use dondra_core::{HotDeal, HotDealId, HotDealWithProduct, ProductId, attach_products};

use super::{Deleted, not_found};
use crate::db::{HotDealRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::extract::{Json, Path};
use crate::middleware::RequireAdminAuth;
use crate::models::{HotDealDraft, HotDealInput};
use crate::state::AppState;

const HOT_DEALS_PATH: &str = "/hot-deals";

/// All deals regardless of status or window, newest first.
pub async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<HotDealWithProduct>>> {
    let deals = HotDealRepository::new(state.pool()).list().await?;
    Ok(Json(with_products(&state, deals).await?))
}

pub async fn show(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<HotDealId>,
) -> Result<Json<HotDealWithProduct>> {
    let deal = HotDealRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Hot deal not found".to_string()))?;
    joined(&state, deal).await.map(Json)
}

pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<HotDealInput>,
) -> Result<(StatusCode, Json<HotDealWithProduct>)> {
    let draft = validated(&state, input).await?;
    let deal = HotDealRepository::new(state.pool()).create(&draft).await?;

    tracing::info!(admin_id = %admin.id, hot_deal_id = %deal.id, "Hot deal created");
    state.storefront().notify(HOT_DEALS_PATH);
    Ok((StatusCode::CREATED, Json(joined(&state, deal).await?)))
}

pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<HotDealId>,
    Json(input): Json<HotDealInput>,
) -> Result<Json<HotDealWithProduct>> {
    let draft = validated(&state, input).await?;
    let deal = HotDealRepository::new(state.pool())
        .update(id, &draft)
        .await
        .map_err(not_found("Hot deal not found"))?;

    tracing::info!(admin_id = %admin.id, hot_deal_id = %id, "Hot deal updated");
    state.storefront().notify(HOT_DEALS_PATH);
    Ok(Json(joined(&state, deal).await?))
}

pub async fn destroy(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<HotDealId>,
) -> Result<Json<Deleted>> {
    HotDealRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found("Hot deal not found"))?;

    tracing::info!(admin_id = %admin.id, hot_deal_id = %id, "Hot deal deleted");
    state.storefront().notify(HOT_DEALS_PATH);
    Ok(Json(Deleted::new("Hot deal deleted successfully")))
}

/// Validate the body and check the referenced product exists.
async fn validated(state: &AppState, input: HotDealInput) -> Result<HotDealDraft> {
    let draft = input.validate()?;
    if !ProductRepository::new(state.pool())
        .exists(draft.product_id)
        .await?
    {
        return Err(AppError::BadRequest("Invalid product ID".to_string()));
    }
    Ok(draft)
}

async fn with_products(state: &AppState, deals: Vec<HotDeal>) -> Result<Vec<HotDealWithProduct>> {
    let mut ids: Vec<ProductId> = deals.iter().map(|d| d.product_id).collect();
    ids.sort_unstable_by_key(ProductId::as_i32);
    ids.dedup();

    let products = ProductRepository::new(state.pool()).summaries(&ids).await?;
    Ok(attach_products(deals, &products, Utc::now()))
}

async fn joined(state: &AppState, deal: HotDeal) -> Result<HotDealWithProduct> {
    with_products(state, vec![deal])
        .await?
        .pop()
        .ok_or_else(|| AppError::NotFound("Product for hot deal not found".to_string()))
}
