//! Hot deal and news banner queries.
//!
//! Rows come back regardless of their window; liveness is decided by the
//! caller against the request's clock so cached rows never outlive a window.

use sqlx::PgPool;

use dondra_core::{HotDeal, HotDealId, NewsBanner};

use super::RepositoryError;

pub struct PromotionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromotionRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Active hot deals that have not ended yet, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_hot_deals(&self) -> Result<Vec<HotDeal>, RepositoryError> {
        let deals = sqlx::query_as::<_, HotDeal>(
            r"
            SELECT id, name, description, product_id, original_price, discounted_price,
                   discount, start_date, end_date, status, created_at, updated_at
            FROM catalog.hot_deal
            WHERE status = 'active' AND end_date >= now()
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(deals)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn hot_deal(&self, id: HotDealId) -> Result<Option<HotDeal>, RepositoryError> {
        let deal = sqlx::query_as::<_, HotDeal>(
            r"
            SELECT id, name, description, product_id, original_price, discounted_price,
                   discount, start_date, end_date, status, created_at, updated_at
            FROM catalog.hot_deal
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(deal)
    }

    /// Active news banners that have not ended yet, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_news_banners(&self) -> Result<Vec<NewsBanner>, RepositoryError> {
        let banners = sqlx::query_as::<_, NewsBanner>(
            r"
            SELECT id, image_url, start_date, end_date, status, created_at, updated_at
            FROM catalog.news_banner
            WHERE status = 'active' AND end_date >= now()
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(banners)
    }
}
