//! Hot deal CRUD.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dondra_core::{HotDeal, HotDealId};

use super::RepositoryError;
use crate::models::HotDealDraft;

pub struct HotDealRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HotDealRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every deal regardless of status or window, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<HotDeal>, RepositoryError> {
        let deals = sqlx::query_as::<_, HotDeal>(
            r"
            SELECT id, name, description, product_id, original_price, discounted_price,
                   discount, start_date, end_date, status, created_at, updated_at
            FROM catalog.hot_deal
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
    pub async fn get(&self, id: HotDealId) -> Result<Option<HotDeal>, RepositoryError> {
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

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, draft: &HotDealDraft) -> Result<HotDeal, RepositoryError> {
        let deal = sqlx::query_as::<_, HotDeal>(
            r"
            INSERT INTO catalog.hot_deal
                (name, description, product_id, original_price, discounted_price,
                 discount, start_date, end_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, description, product_id, original_price, discounted_price,
                      discount, start_date, end_date, status, created_at, updated_at
            ",
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.product_id)
        .bind(draft.original_price)
        .bind(draft.discounted_price)
        .bind(&draft.discount)
        .bind(draft.window.start())
        .bind(draft.window.end())
        .bind(draft.status)
        .fetch_one(self.pool)
        .await?;

        Ok(deal)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the deal does not exist.
    pub async fn update(
        &self,
        id: HotDealId,
        draft: &HotDealDraft,
    ) -> Result<HotDeal, RepositoryError> {
        sqlx::query_as::<_, HotDeal>(
            r"
            UPDATE catalog.hot_deal
            SET name = $2, description = $3, product_id = $4, original_price = $5,
                discounted_price = $6, discount = $7, start_date = $8, end_date = $9,
                status = $10, updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, product_id, original_price, discounted_price,
                      discount, start_date, end_date, status, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.product_id)
        .bind(draft.original_price)
        .bind(draft.discounted_price)
        .bind(&draft.discount)
        .bind(draft.window.start())
        .bind(draft.window.end())
        .bind(draft.status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the deal does not exist.
    pub async fn delete(&self, id: HotDealId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.hot_deal WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Deals live at `now`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_live(&self, now: DateTime<Utc>) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM catalog.hot_deal
            WHERE status = 'active' AND start_date <= $1 AND end_date >= $1
            ",
        )
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
