use async_trait::async_trait;
use domain::{Competition, CompetitionCategory, CompetitionId};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{
    CategoryDefinitionRow, CompetitionCategoryRow, CompetitionRow, FishCatchRow, ParticipantRow,
};

use super::CompetitionStore;

/// Repository for Competition aggregates
pub struct CompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitionRepository<'a> {
    /// Create a new CompetitionRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    async fn load_children(
        conn: &mut PgConnection,
        competition_id: CompetitionId,
    ) -> Result<(
        Vec<domain::Participant>,
        Vec<domain::CompetitionCategory>,
        Vec<domain::FishCatch>,
    )> {
        let participants = sqlx::query_as::<_, ParticipantRow>(&format!(
            "SELECT {} FROM participants WHERE competition_id = $1 ORDER BY created_at, participant_id",
            ParticipantRow::COLUMNS
        ))
        .bind(competition_id)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<_>>>()?;

        let categories = sqlx::query_as::<_, CompetitionCategoryRow>(&format!(
            r#"
            SELECT cc.category_id, cc.is_primary_scoring, cc.is_enabled, cc.sort_order,
                   cc.fish_species_id, cc.custom_name_override, {}
            FROM competition_categories cc
            JOIN category_definitions d ON d.definition_id = cc.definition_id
            WHERE cc.competition_id = $1
            ORDER BY cc.sort_order, cc.category_id
            "#,
            CategoryDefinitionRow::COLUMNS
        ))
        .bind(competition_id)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<_>>>()?;

        let fish_catches = sqlx::query_as::<_, FishCatchRow>(&format!(
            "SELECT {} FROM fish_catches WHERE competition_id = $1 ORDER BY catch_time, fish_catch_id",
            FishCatchRow::COLUMNS
        ))
        .bind(competition_id)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<_>>>()?;

        Ok((participants, categories, fish_catches))
    }
}

#[async_trait]
impl CompetitionStore for CompetitionRepository<'_> {
    async fn find(&self, id: CompetitionId) -> Result<Option<Competition>> {
        // One snapshot for the row and its children, so a concurrent save
        // cannot mix two versions.
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, CompetitionRow>(&format!(
            "SELECT {} FROM competitions WHERE competition_id = $1",
            CompetitionRow::COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let (participants, categories, fish_catches) = Self::load_children(&mut tx, id).await?;
        tx.commit().await?;
        let state = row.into_state(participants, categories, fish_catches)?;

        Ok(Some(Competition::restore(state)))
    }

    async fn insert(&self, competition: &mut Competition) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let details = competition.details();
        let audit = competition.audit();

        let (competition_id, version): (i32, i32) = sqlx::query_as(
            r#"
            INSERT INTO competitions (
                name, start_time, end_time, competition_type, organizer_id, fishery_id,
                rules, image_url, image_public_id, status, status_reason, version,
                created_at, created_by, last_modified_at, last_modified_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 1, $12, $13, $14, $15)
            RETURNING competition_id, version
            "#,
        )
        .bind(&details.name)
        .bind(details.schedule.start())
        .bind(details.schedule.end())
        .bind(details.competition_type.to_string())
        .bind(competition.organizer_id())
        .bind(details.fishery_id)
        .bind(&details.rules)
        .bind(&details.image_url)
        .bind(&details.image_public_id)
        .bind(competition.status().to_string())
        .bind(competition.status_reason())
        .bind(audit.created_at)
        .bind(audit.created_by)
        .bind(audit.last_modified_at)
        .bind(audit.last_modified_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_constraint_error)?;

        write_children(&mut tx, competition_id, competition).await?;
        tx.commit().await?;

        competition.mark_persisted(competition_id, version);
        Ok(())
    }

    async fn save(&self, competition: &mut Competition) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let details = competition.details();
        let audit = competition.audit();
        let expected_version = competition.version();

        let version: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE competitions
            SET
                name = $3,
                start_time = $4,
                end_time = $5,
                competition_type = $6,
                fishery_id = $7,
                rules = $8,
                image_url = $9,
                image_public_id = $10,
                status = $11,
                status_reason = $12,
                last_modified_at = $13,
                last_modified_by = $14,
                version = version + 1
            WHERE competition_id = $1 AND version = $2
            RETURNING version
            "#,
        )
        .bind(competition.id())
        .bind(expected_version)
        .bind(&details.name)
        .bind(details.schedule.start())
        .bind(details.schedule.end())
        .bind(details.competition_type.to_string())
        .bind(details.fishery_id)
        .bind(&details.rules)
        .bind(&details.image_url)
        .bind(&details.image_public_id)
        .bind(competition.status().to_string())
        .bind(competition.status_reason())
        .bind(audit.last_modified_at)
        .bind(audit.last_modified_by)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_constraint_error)?;

        let Some(version) = version else {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM competitions WHERE competition_id = $1)",
            )
            .bind(competition.id())
            .fetch_one(&mut *tx)
            .await?;

            return Err(if exists {
                StorageError::ConcurrencyConflict {
                    competition_id: competition.id(),
                    expected_version,
                }
            } else {
                StorageError::NotFound
            });
        };

        write_children(&mut tx, competition.id(), competition).await?;
        tx.commit().await?;

        competition.mark_persisted(competition.id(), version);
        Ok(())
    }
}

/// Upserts every child row of the aggregate and deletes removed catches.
async fn write_children(
    conn: &mut PgConnection,
    competition_id: CompetitionId,
    competition: &Competition,
) -> Result<()> {
    for category in categories_in_write_order(competition) {
        sqlx::query(
            r#"
            INSERT INTO competition_categories (
                category_id, competition_id, definition_id, is_primary_scoring, is_enabled,
                sort_order, fish_species_id, custom_name_override
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (category_id) DO UPDATE SET
                is_enabled = EXCLUDED.is_enabled,
                sort_order = EXCLUDED.sort_order,
                fish_species_id = EXCLUDED.fish_species_id,
                custom_name_override = EXCLUDED.custom_name_override
            "#,
        )
        .bind(category.id)
        .bind(competition_id)
        .bind(category.definition.id())
        .bind(category.is_primary_scoring)
        .bind(category.is_enabled)
        .bind(category.sort_order)
        .bind(category.fish_species_id)
        .bind(&category.custom_name_override)
        .execute(&mut *conn)
        .await
        .map_err(map_constraint_error)?;
    }

    for participant in competition.participants() {
        sqlx::query(
            r#"
            INSERT INTO participants (
                participant_id, competition_id, user_id, guest_name, role, status, sector,
                stand, rejection_reason, created_at, created_by, last_modified_at,
                last_modified_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (participant_id) DO UPDATE SET
                status = EXCLUDED.status,
                sector = EXCLUDED.sector,
                stand = EXCLUDED.stand,
                rejection_reason = EXCLUDED.rejection_reason,
                last_modified_at = EXCLUDED.last_modified_at,
                last_modified_by = EXCLUDED.last_modified_by
            "#,
        )
        .bind(participant.id)
        .bind(competition_id)
        .bind(participant.user_id)
        .bind(&participant.guest_name)
        .bind(participant.role.to_string())
        .bind(participant.status.to_string())
        .bind(&participant.sector)
        .bind(&participant.stand)
        .bind(&participant.rejection_reason)
        .bind(participant.audit.created_at)
        .bind(participant.audit.created_by)
        .bind(participant.audit.last_modified_at)
        .bind(participant.audit.last_modified_by)
        .execute(&mut *conn)
        .await
        .map_err(map_constraint_error)?;
    }

    let catch_ids: Vec<Uuid> = competition
        .fish_catches()
        .iter()
        .map(|fish_catch| fish_catch.id)
        .collect();

    sqlx::query("DELETE FROM fish_catches WHERE competition_id = $1 AND NOT (fish_catch_id = ANY($2))")
        .bind(competition_id)
        .bind(&catch_ids)
        .execute(&mut *conn)
        .await?;

    for row in competition.fish_catches().iter().map(FishCatchRow::from_catch) {
        sqlx::query(
            r#"
            INSERT INTO fish_catches (
                fish_catch_id, competition_id, participant_id, judge_id, fish_species_id,
                catch_time, length_cm, weight_kg, notes, created_at, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (fish_catch_id) DO NOTHING
            "#,
        )
        .bind(row.fish_catch_id)
        .bind(competition_id)
        .bind(row.participant_id)
        .bind(row.judge_id)
        .bind(row.fish_species_id)
        .bind(row.catch_time)
        .bind(row.length_cm)
        .bind(row.weight_kg)
        .bind(&row.notes)
        .bind(row.created_at)
        .bind(row.created_by)
        .execute(&mut *conn)
        .await
        .map_err(map_constraint_error)?;
    }

    Ok(())
}

/// Disabled categories first, so the single-enabled-primary index never sees
/// two enabled primaries while a swap is being written.
fn categories_in_write_order(competition: &Competition) -> Vec<&CompetitionCategory> {
    let mut categories: Vec<_> = competition.categories().iter().collect();
    categories.sort_by_key(|category| category.is_enabled);
    categories
}

fn map_constraint_error(e: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(ref db_err) = e {
        match db_err.code().as_deref() {
            Some("23505") => {
                return StorageError::ConstraintViolation(
                    db_err
                        .constraint()
                        .map(|name| format!("Duplicate value violates {name}"))
                        .unwrap_or_else(|| "Duplicate value".to_string()),
                );
            }
            Some("23503") => {
                return StorageError::ConstraintViolation(
                    "Referenced record does not exist".to_string(),
                );
            }
            _ => {}
        }
    }
    StorageError::from(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use domain::{
        CalculationLogic, CategoryDefinition, CategoryEntityType, CategoryMetric, CategoryType,
        CommandContext, CompetitionDetails, CompetitionStatus, CompetitionType, DateTimeRange,
        FishLength, NewCategory, NewFishCatch, ScoringRule,
    };
    use rust_decimal::Decimal;

    const ORGANIZER: Uuid = Uuid::from_u128(1);
    const ANGLER: Uuid = Uuid::from_u128(2);

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 5, 5, 0, 0).unwrap()
    }

    fn ctx(now: DateTime<Utc>) -> CommandContext {
        CommandContext {
            actor: ORGANIZER,
            now,
        }
    }

    fn longest_fish() -> CategoryDefinition {
        CategoryDefinition::new(
            1,
            "Najdłuższa ryba".to_string(),
            None,
            true,
            CategoryType::MainScoring,
            ScoringRule {
                metric: CategoryMetric::LengthCm,
                calculation_logic: CalculationLogic::MaxValue,
                entity_type: CategoryEntityType::FishCatch,
            },
            false,
            false,
        )
        .unwrap()
    }

    /// Draft whose original primary was disabled and replaced.
    fn draft_with_swapped_primary() -> (Competition, Uuid) {
        let before = ctx(start() - Duration::days(7));
        let details = CompetitionDetails {
            name: "Puchar Bugu".to_string(),
            schedule: DateTimeRange::new(start(), start() + Duration::hours(6)).unwrap(),
            competition_type: CompetitionType::Public,
            fishery_id: 1,
            rules: None,
            image_url: None,
            image_public_id: None,
        };
        let (mut competition, _) =
            Competition::create(details, NewCategory::primary(longest_fish()), vec![], &before)
                .unwrap();
        let old_primary = competition.primary_category().unwrap().id;
        competition
            .set_category_enabled(old_primary, false, &before)
            .unwrap();
        competition
            .add_category(NewCategory::primary(longest_fish()), &before)
            .unwrap();
        (competition, old_primary)
    }

    #[test]
    fn test_disabled_categories_are_written_first() {
        let (competition, old_primary) = draft_with_swapped_primary();
        let order = categories_in_write_order(&competition);

        assert_eq!(order.len(), 2);
        assert_eq!(order[0].id, old_primary);
        assert!(!order[0].is_enabled);
        assert!(order[1].is_enabled_primary());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a PostgreSQL DATABASE_URL"]
    async fn test_aggregate_round_trip(pool: PgPool) {
        sqlx::query("INSERT INTO fisheries (fishery_id, name) VALUES (1, 'Zalew Zegrzyński')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            r#"
            INSERT INTO category_definitions (
                definition_id, name, category_type, metric, calculation_logic, entity_type
            )
            VALUES (1, 'Najdłuższa ryba', 'main_scoring', 'length_cm', 'max_value', 'fish_catch')
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let repository = CompetitionRepository::new(&pool);
        let (mut competition, _) = draft_with_swapped_primary();
        repository.insert(&mut competition).await.unwrap();
        let id = competition.id();

        let before = ctx(start() - Duration::days(1));
        competition.request_approval(&before).unwrap();
        competition.approve_competition(&before).unwrap();
        competition
            .register_participant(ANGLER, &CommandContext { actor: ANGLER, ..before })
            .unwrap();
        let angler = competition.participant_for_user(ANGLER).unwrap().id;
        competition.approve_participant(angler, &before).unwrap();
        competition.schedule_competition(&before).unwrap();
        competition.start_competition(&before).unwrap();

        let during = ctx(start() + Duration::hours(1));
        let (fish_catch, _) = competition
            .record_fish_catch(
                NewFishCatch {
                    participant_id: angler,
                    judge_id: ORGANIZER,
                    fish_species_id: None,
                    catch_time: start() + Duration::minutes(50),
                    length: Some(FishLength::new(Decimal::new(4556, 2)).unwrap()),
                    weight: None,
                    notes: None,
                },
                &during,
            )
            .unwrap();
        repository.save(&mut competition).await.unwrap();

        let mut loaded = repository.find(id).await.unwrap().unwrap();
        assert_eq!(loaded.status(), CompetitionStatus::Ongoing);
        assert_eq!(loaded.version(), competition.version());
        assert_eq!(loaded.categories().len(), 2);
        assert!(loaded.primary_category().is_some());
        assert_eq!(
            loaded.fish_catches()[0].length,
            Some(FishLength::new(Decimal::new(4556, 2)).unwrap())
        );

        loaded.remove_fish_catch(fish_catch.id, &during).unwrap();
        repository.save(&mut loaded).await.unwrap();
        assert!(
            repository
                .find(id)
                .await
                .unwrap()
                .unwrap()
                .fish_catches()
                .is_empty()
        );

        let err = repository.save(&mut competition).await.unwrap_err();
        assert!(err.is_concurrency_conflict());
    }
}
