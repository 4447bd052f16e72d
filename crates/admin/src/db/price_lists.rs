//! Price list uploads.
//!
//! At most one entry is `active` after any write through this repository:
//! creating an active entry demotes the others in the same transaction.

use sqlx::PgPool;

use dondra_core::{PriceList, PriceListId, PriceListStatus};

use super::{RepositoryError, conflict_on_unique};

pub struct PriceListRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PriceListRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<PriceList>, RepositoryError> {
        let lists = sqlx::query_as::<_, PriceList>(
            r"
            SELECT id, image_url, status, created_at, updated_at
            FROM catalog.price_list
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(lists)
    }

    /// Insert a price list, deactivating every other active one first when
    /// `status` is `Active`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a concurrent publish won the
    /// single active slot, `RepositoryError::Database` if the transaction
    /// fails. Nothing is changed in either case.
    pub async fn create(
        &self,
        image_url: &str,
        status: PriceListStatus,
    ) -> Result<PriceList, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if status == PriceListStatus::Active {
            let demoted = sqlx::query(
                r"
                UPDATE catalog.price_list
                SET status = 'inactive', updated_at = now()
                WHERE status = 'active'
                ",
            )
            .execute(&mut *tx)
            .await?
            .rows_affected();
            tracing::debug!(demoted, "Deactivated previous price lists");
        }

        let list = sqlx::query_as::<_, PriceList>(
            r"
            INSERT INTO catalog.price_list (image_url, status)
            VALUES ($1, $2)
            RETURNING id, image_url, status, created_at, updated_at
            ",
        )
        .bind(image_url)
        .bind(status)
        .fetch_one(&mut *tx)
        .await
        .map_err(conflict_on_unique("another price list was published concurrently"))?;

        tx.commit().await?;
        Ok(list)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the price list does not exist.
    pub async fn delete(&self, id: PriceListId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.price_list WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
