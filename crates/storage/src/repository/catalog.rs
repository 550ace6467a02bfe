use async_trait::async_trait;
use domain::{CategoryDefinition, CategoryDefinitionId};
use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::CategoryDefinitionRow;

use super::CatalogStore;

pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for CatalogRepository<'_> {
    async fn find_category_definition(
        &self,
        id: CategoryDefinitionId,
    ) -> Result<CategoryDefinition> {
        sqlx::query_as::<_, CategoryDefinitionRow>(&format!(
            "SELECT {} FROM category_definitions d WHERE d.definition_id = $1",
            CategoryDefinitionRow::COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?
        .try_into()
    }

    async fn fish_species_exists(&self, id: i32) -> Result<bool> {
        let exists = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM fish_species WHERE fish_species_id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    async fn fishery_exists(&self, id: i32) -> Result<bool> {
        let exists = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM fisheries WHERE fishery_id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }
}
