use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use domain::{CategoryDefinition, CategoryDefinitionId, Competition, CompetitionId};
use tokio::sync::RwLock;

use crate::error::{Result, StorageError};

use super::{CatalogStore, CompetitionStore};

#[derive(Debug, Default)]
struct Tables {
    next_id: CompetitionId,
    competitions: HashMap<CompetitionId, Competition>,
}

/// Process-local store with the same versioning rules as the PostgreSQL
/// repositories. Used by tests and local runs without a database.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    category_definitions: HashMap<CategoryDefinitionId, CategoryDefinition>,
    fish_species: HashSet<i32>,
    fisheries: HashSet<i32>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category_definition(mut self, definition: CategoryDefinition) -> Self {
        self.category_definitions.insert(definition.id(), definition);
        self
    }

    pub fn with_fish_species(mut self, id: i32) -> Self {
        self.fish_species.insert(id);
        self
    }

    pub fn with_fishery(mut self, id: i32) -> Self {
        self.fisheries.insert(id);
        self
    }
}

#[async_trait]
impl CompetitionStore for InMemoryStore {
    async fn find(&self, id: CompetitionId) -> Result<Option<Competition>> {
        Ok(self.tables.read().await.competitions.get(&id).cloned())
    }

    async fn insert(&self, competition: &mut Competition) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.next_id += 1;
        let id = tables.next_id;

        competition.mark_persisted(id, 1);
        tables.competitions.insert(id, competition.clone());
        Ok(())
    }

    async fn save(&self, competition: &mut Competition) -> Result<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .competitions
            .get_mut(&competition.id())
            .ok_or(StorageError::NotFound)?;

        if stored.version() != competition.version() {
            return Err(StorageError::ConcurrencyConflict {
                competition_id: competition.id(),
                expected_version: competition.version(),
            });
        }

        competition.mark_persisted(competition.id(), competition.version() + 1);
        *stored = competition.clone();
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn find_category_definition(
        &self,
        id: CategoryDefinitionId,
    ) -> Result<CategoryDefinition> {
        self.category_definitions
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn fish_species_exists(&self, id: i32) -> Result<bool> {
        Ok(self.fish_species.contains(&id))
    }

    async fn fishery_exists(&self, id: i32) -> Result<bool> {
        Ok(self.fisheries.contains(&id))
    }
}
