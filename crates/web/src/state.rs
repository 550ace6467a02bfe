use std::sync::Arc;

use domain::{
    Actor, ApprovalPolicy, Clock, CommandContext, Competition, CompetitionEvent, CompetitionId,
};
use storage::{
    CatalogStore, CompetitionStore, Database,
    repository::{CatalogRepository, CompetitionRepository},
};

use crate::error::{WebError, WebResult};

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub clock: Arc<dyn Clock>,
    pub approval_policy: Arc<dyn ApprovalPolicy>,
}

impl AppState {
    pub fn repositories(&self) -> Repositories<'_> {
        Repositories {
            competitions: CompetitionRepository::new(self.db.pool()),
            catalog: CatalogRepository::new(self.db.pool()),
        }
    }
}

/// PostgreSQL repositories borrowed from the pool for one request
pub struct Repositories<'a> {
    competitions: CompetitionRepository<'a>,
    catalog: CatalogRepository<'a>,
}

impl<'a> Repositories<'a> {
    pub fn env(&'a self, state: &'a AppState) -> CommandEnv<'a> {
        CommandEnv {
            competitions: &self.competitions,
            catalog: &self.catalog,
            clock: state.clock.as_ref(),
            approval_policy: state.approval_policy.as_ref(),
        }
    }
}

/// Everything a command service needs: stores, time and the approval rule.
pub struct CommandEnv<'a> {
    pub competitions: &'a dyn CompetitionStore,
    pub catalog: &'a dyn CatalogStore,
    pub clock: &'a dyn Clock,
    pub approval_policy: &'a dyn ApprovalPolicy,
}

impl CommandEnv<'_> {
    pub fn context(&self, actor: &Actor) -> CommandContext {
        CommandContext::new(actor.user_id, self.clock)
    }

    pub async fn load(&self, id: CompetitionId) -> WebResult<Competition> {
        self.competitions.find(id).await?.ok_or(WebError::NotFound)
    }

    /// Saves the aggregate, then publishes the event the operation produced.
    pub async fn commit(
        &self,
        competition: &mut Competition,
        event: CompetitionEvent,
    ) -> WebResult<()> {
        self.competitions.save(competition).await?;
        publish(competition, &event);
        Ok(())
    }

    pub async fn commit_new(
        &self,
        competition: &mut Competition,
        event: CompetitionEvent,
    ) -> WebResult<()> {
        self.competitions.insert(competition).await?;
        publish(competition, &event);
        Ok(())
    }
}

fn publish(competition: &Competition, event: &CompetitionEvent) {
    tracing::info!(
        competition_id = competition.id(),
        version = competition.version(),
        event = event.name(),
        "{:?}",
        event
    );
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use domain::{
        CalculationLogic, CategoryDefinition, CategoryEntityType, CategoryMetric, CategoryType,
        FixedClock, OrganizerOrAdmin, ScoringRule,
    };
    use storage::repository::InMemoryStore;
    use storage::dto::competition::{
        CategoryRequest, CreateCompetitionRequest, StatusChangeRequest,
    };
    use uuid::Uuid;

    use super::*;

    pub const FISHERY: i32 = 1;
    pub const PIKE: i32 = 7;

    pub fn organizer() -> Actor {
        Actor::user(Uuid::from_u128(1))
    }

    pub fn angler() -> Actor {
        Actor::user(Uuid::from_u128(2))
    }

    pub fn judge() -> Actor {
        Actor::user(Uuid::from_u128(3))
    }

    pub fn admin() -> Actor {
        Actor::admin(Uuid::from_u128(99))
    }

    pub fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 14, 6, 0, 0).unwrap()
    }

    fn definition(
        id: i32,
        category_type: CategoryType,
        metric: CategoryMetric,
        requires_species: bool,
    ) -> CategoryDefinition {
        CategoryDefinition::new(
            id,
            format!("Definition {}", id),
            None,
            true,
            category_type,
            ScoringRule {
                metric,
                calculation_logic: CalculationLogic::MaxValue,
                entity_type: CategoryEntityType::FishCatch,
            },
            requires_species,
            false,
        )
        .unwrap()
    }

    /// In-memory stores and a fixed clock a month before the start.
    pub struct TestEnv {
        pub store: InMemoryStore,
        pub clock: FixedClock,
        pub policy: Box<dyn ApprovalPolicy>,
    }

    impl TestEnv {
        pub fn new() -> Self {
            let store = InMemoryStore::new()
                .with_category_definition(definition(
                    1,
                    CategoryType::MainScoring,
                    CategoryMetric::LengthCm,
                    false,
                ))
                .with_category_definition(definition(
                    2,
                    CategoryType::SpecialAchievement,
                    CategoryMetric::LengthCm,
                    true,
                ))
                .with_category_definition(definition(
                    3,
                    CategoryType::SpecialAchievement,
                    CategoryMetric::WeightKg,
                    false,
                ))
                .with_fish_species(PIKE)
                .with_fishery(FISHERY);

            Self {
                store,
                clock: FixedClock(start() - Duration::days(30)),
                policy: Box::new(OrganizerOrAdmin),
            }
        }

        pub fn env(&self) -> CommandEnv<'_> {
            CommandEnv {
                competitions: &self.store,
                catalog: &self.store,
                clock: &self.clock,
                approval_policy: self.policy.as_ref(),
            }
        }

        pub fn set_now(&mut self, now: DateTime<Utc>) {
            self.clock = FixedClock(now);
        }
    }

    /// Creates competition 1 and walks it to AcceptingRegistrations.
    pub async fn accepting_registrations(test: &TestEnv) {
        use crate::features::competitions::services::{change_status, create_competition};

        create_competition(&test.env(), &organizer(), &create_request())
            .await
            .unwrap();
        for operation in ["request_approval", "approve_competition"] {
            let request = StatusChangeRequest {
                operation: operation.to_string(),
                reason: None,
            };
            change_status(&test.env(), &organizer(), 1, &request)
                .await
                .unwrap();
        }
    }

    pub fn create_request() -> CreateCompetitionRequest {
        CreateCompetitionRequest {
            name: "Grand Prix Zalewu Zegrzyńskiego".to_string(),
            start_time: start(),
            end_time: start() + Duration::hours(8),
            competition_type: "public".to_string(),
            fishery_id: FISHERY,
            rules: None,
            image_url: None,
            image_public_id: None,
            primary_category: CategoryRequest {
                definition_id: 1,
                fish_species_id: None,
                custom_name_override: None,
                sort_order: None,
            },
            special_categories: vec![CategoryRequest {
                definition_id: 2,
                fish_species_id: Some(PIKE),
                custom_name_override: Some("Największy szczupak".to_string()),
                sort_order: None,
            }],
        }
    }
}
