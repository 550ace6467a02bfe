use async_trait::async_trait;
use domain::{CategoryDefinition, CategoryDefinitionId, Competition, CompetitionId};

use crate::error::Result;

pub mod catalog;
pub mod competition;
pub mod memory;

pub use catalog::CatalogRepository;
pub use competition::CompetitionRepository;
pub use memory::InMemoryStore;

/// Loads and persists whole competition aggregates.
#[async_trait]
pub trait CompetitionStore: Send + Sync {
    /// Loads the aggregate with its participants, categories and catches.
    async fn find(&self, id: CompetitionId) -> Result<Option<Competition>>;

    /// Stores a new aggregate and assigns its id and initial version.
    async fn insert(&self, competition: &mut Competition) -> Result<()>;

    /// Writes a loaded aggregate back. Fails with
    /// [`StorageError::ConcurrencyConflict`](crate::error::StorageError::ConcurrencyConflict)
    /// when someone else saved it since it was loaded.
    async fn save(&self, competition: &mut Competition) -> Result<()>;
}

/// Read-only reference data consulted while configuring competitions and
/// recording catches.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_category_definition(&self, id: CategoryDefinitionId)
    -> Result<CategoryDefinition>;

    async fn fish_species_exists(&self, id: i32) -> Result<bool>;

    async fn fishery_exists(&self, id: i32) -> Result<bool>;
}
