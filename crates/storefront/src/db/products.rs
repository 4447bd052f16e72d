//! Product queries.

use sqlx::PgPool;

use dondra_core::{Product, ProductId, ProductSummary};

use super::{RepositoryError, escape_like};

pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, category, price, images, status,
                   min_order, is_featured, created_at, updated_at
            FROM catalog.product
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, category, price, images, status,
                   min_order, is_featured, created_at, updated_at
            FROM catalog.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Other products in the same category as `id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if `id` does not exist.
    pub async fn related(&self, id: ProductId) -> Result<Vec<Product>, RepositoryError> {
        let product = self.get(id).await?.ok_or(RepositoryError::NotFound)?;

        let related = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, category, price, images, status,
                   min_order, is_featured, created_at, updated_at
            FROM catalog.product
            WHERE category = $1 AND id <> $2
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(&product.category)
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(related)
    }

    /// The `limit` most recently added products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, category, price, images, status,
                   min_order, is_featured, created_at, updated_at
            FROM catalog.product
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// In-stock products for the homepage, featured ones first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn featured(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, category, price, images, status,
                   min_order, is_featured, created_at, updated_at
            FROM catalog.product
            WHERE status = 'in_stock'
            ORDER BY is_featured DESC, created_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Products whose category contains `category_name`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn in_category(
        &self,
        category_name: &str,
        limit: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let pattern = format!("%{}%", escape_like(category_name));

        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, category, price, images, status,
                   min_order, is_featured, created_at, updated_at
            FROM catalog.product
            WHERE category ILIKE $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Summaries for the given products, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summaries(&self, ids: &[ProductId]) -> Result<Vec<ProductSummary>, RepositoryError> {
        let raw: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();

        let summaries = sqlx::query_as::<_, ProductSummary>(
            r"
            SELECT id, name, images, price, status
            FROM catalog.product
            WHERE id = ANY($1)
            ",
        )
        .bind(raw)
        .fetch_all(self.pool)
        .await?;

        Ok(summaries)
    }
}
