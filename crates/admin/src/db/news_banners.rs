//! News banner CRUD.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dondra_core::{NewsBanner, NewsBannerId};

use super::RepositoryError;
use crate::models::NewsBannerDraft;

pub struct NewsBannerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NewsBannerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<NewsBanner>, RepositoryError> {
        let banners = sqlx::query_as::<_, NewsBanner>(
            r"
            SELECT id, image_url, start_date, end_date, status, created_at, updated_at
            FROM catalog.news_banner
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(banners)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: NewsBannerId) -> Result<Option<NewsBanner>, RepositoryError> {
        let banner = sqlx::query_as::<_, NewsBanner>(
            r"
            SELECT id, image_url, start_date, end_date, status, created_at, updated_at
            FROM catalog.news_banner
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(banner)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, draft: &NewsBannerDraft) -> Result<NewsBanner, RepositoryError> {
        let banner = sqlx::query_as::<_, NewsBanner>(
            r"
            INSERT INTO catalog.news_banner (image_url, start_date, end_date, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, image_url, start_date, end_date, status, created_at, updated_at
            ",
        )
        .bind(&draft.image_url)
        .bind(draft.window.start())
        .bind(draft.window.end())
        .bind(draft.status)
        .fetch_one(self.pool)
        .await?;

        Ok(banner)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the banner does not exist.
    pub async fn update(
        &self,
        id: NewsBannerId,
        draft: &NewsBannerDraft,
    ) -> Result<NewsBanner, RepositoryError> {
        sqlx::query_as::<_, NewsBanner>(
            r"
            UPDATE catalog.news_banner
            SET image_url = $2, start_date = $3, end_date = $4, status = $5, updated_at = now()
            WHERE id = $1
            RETURNING id, image_url, start_date, end_date, status, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&draft.image_url)
        .bind(draft.window.start())
        .bind(draft.window.end())
        .bind(draft.status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the banner does not exist.
    pub async fn delete(&self, id: NewsBannerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.news_banner WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Banners live at `now`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_live(&self, now: DateTime<Utc>) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM catalog.news_banner
            WHERE status = 'active' AND start_date <= $1 AND end_date >= $1
            ",
        )
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
