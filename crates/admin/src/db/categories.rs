//! Category CRUD.

use sqlx::PgPool;

use dondra_core::{Category, CategoryId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::CategoryDraft;

const DUPLICATE_SLUG: &str = "a category with this name already exists";

pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every category, active or not, by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug, image, is_active, created_at, updated_at
            FROM catalog.category
            ORDER BY name, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn create(&self, draft: &CategoryDraft) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            INSERT INTO catalog.category (name, slug, image, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, slug, image, is_active, created_at, updated_at
            ",
        )
        .bind(&draft.name)
        .bind(&draft.slug)
        .bind(&draft.image)
        .bind(draft.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique(DUPLICATE_SLUG))?;

        Ok(category)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist, or
    /// `RepositoryError::Conflict` if the new slug is taken.
    pub async fn update(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, RepositoryError> {
        sqlx::query_as::<_, Category>(
            r"
            UPDATE catalog.category
            SET name = $2, slug = $3, image = $4, is_active = $5, updated_at = now()
            WHERE id = $1
            RETURNING id, name, slug, image, is_active, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.slug)
        .bind(&draft.image)
        .bind(draft.is_active)
        .fetch_optional(self.pool)
        .await
        .map_err(conflict_on_unique(DUPLICATE_SLUG))?
        .ok_or(RepositoryError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.category WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
