//! Price list queries.

use sqlx::PgPool;

use dondra_core::PriceList;

use super::RepositoryError;

pub struct PriceListRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PriceListRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The newest active price list and the newest of any status.
    ///
    /// At most two rows, enough for [`dondra_core::current_price_list`] to
    /// pick from.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn candidates(&self) -> Result<Vec<PriceList>, RepositoryError> {
        let lists = sqlx::query_as::<_, PriceList>(
            r"
            (SELECT id, image_url, status, created_at, updated_at
             FROM catalog.price_list
             WHERE status = 'active'
             ORDER BY created_at DESC, id DESC
             LIMIT 1)
            UNION
            (SELECT id, image_url, status, created_at, updated_at
             FROM catalog.price_list
             ORDER BY created_at DESC, id DESC
             LIMIT 1)
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(lists)
    }
}
