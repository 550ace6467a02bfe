use chrono::{DateTime, Utc};
use domain::{Audit, FishCatch, FishLength, FishWeight};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{Result, StorageError};

#[derive(Debug, Clone, FromRow)]
pub struct FishCatchRow {
    pub fish_catch_id: Uuid,
    pub participant_id: Uuid,
    pub judge_id: Uuid,
    pub fish_species_id: Option<i32>,
    pub catch_time: DateTime<Utc>,
    pub length_cm: Option<Decimal>,
    pub weight_kg: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
}

impl FishCatchRow {
    pub const COLUMNS: &'static str = "fish_catch_id, participant_id, judge_id, \
        fish_species_id, catch_time, length_cm, weight_kg, notes, created_at, created_by";

    /// Measurements are written at the scale of their `NUMERIC` columns.
    pub fn from_catch(fish_catch: &FishCatch) -> Self {
        Self {
            fish_catch_id: fish_catch.id,
            participant_id: fish_catch.participant_id,
            judge_id: fish_catch.judge_id,
            fish_species_id: fish_catch.fish_species_id,
            catch_time: fish_catch.catch_time,
            length_cm: fish_catch
                .length
                .map(|length| length.centimetres().round_dp(FishLength::SCALE)),
            weight_kg: fish_catch
                .weight
                .map(|weight| weight.kilograms().round_dp(FishWeight::SCALE)),
            notes: fish_catch.notes.clone(),
            created_at: fish_catch.audit.created_at,
            created_by: fish_catch.audit.created_by,
        }
    }
}

impl TryFrom<FishCatchRow> for FishCatch {
    type Error = StorageError;

    fn try_from(row: FishCatchRow) -> Result<Self> {
        Ok(FishCatch {
            id: row.fish_catch_id,
            participant_id: row.participant_id,
            judge_id: row.judge_id,
            fish_species_id: row.fish_species_id,
            catch_time: row.catch_time,
            length: row.length_cm.map(FishLength::new).transpose()?,
            weight: row.weight_kg.map(FishWeight::new).transpose()?,
            notes: row.notes,
            audit: Audit {
                created_at: row.created_at,
                created_by: row.created_by,
                last_modified_at: None,
                last_modified_by: None,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// What Postgres hands back for a `NUMERIC(p, scale)` column.
    fn as_numeric(value: Decimal, scale: u32) -> Decimal {
        let mut stored = value.round_dp(scale);
        stored.rescale(scale);
        stored
    }

    fn fish_catch(length: Option<Decimal>, weight: Option<Decimal>) -> FishCatch {
        FishCatch {
            id: Uuid::from_u128(10),
            participant_id: Uuid::from_u128(2),
            judge_id: Uuid::from_u128(3),
            fish_species_id: None,
            catch_time: Utc::now(),
            length: length.map(|cm| FishLength::new(cm).unwrap()),
            weight: weight.map(|kg| FishWeight::new(kg).unwrap()),
            notes: None,
            audit: Audit {
                created_at: Utc::now(),
                created_by: Uuid::from_u128(3),
                last_modified_at: None,
                last_modified_by: None,
            },
        }
    }

    #[test]
    fn test_measurements_survive_numeric_columns() {
        for (length, weight) in [
            (Some(Decimal::new(1, 2)), None),
            (Some(Decimal::new(4556, 2)), Some(Decimal::new(1, 3))),
            (None, Some(Decimal::new(12345, 3))),
            (Some(Decimal::new(500, 0)), Some(Decimal::new(200, 0))),
        ] {
            let original = fish_catch(length, weight);
            let mut row = FishCatchRow::from_catch(&original);
            row.length_cm = row.length_cm.map(|cm| as_numeric(cm, 2));
            row.weight_kg = row.weight_kg.map(|kg| as_numeric(kg, 3));

            let reloaded = FishCatch::try_from(row).unwrap();
            assert_eq!(reloaded.length, original.length);
            assert_eq!(reloaded.weight, original.weight);
        }
    }

    #[test]
    fn test_row_conversion_validates_measurements() {
        let row = FishCatchRow {
            fish_catch_id: Uuid::from_u128(1),
            participant_id: Uuid::from_u128(2),
            judge_id: Uuid::from_u128(3),
            fish_species_id: Some(7),
            catch_time: Utc::now(),
            length_cm: Some(Decimal::new(6230, 2)),
            weight_kg: None,
            notes: Some("Szczupak".to_string()),
            created_at: Utc::now(),
            created_by: Uuid::from_u128(3),
        };
        let fish_catch = FishCatch::try_from(row.clone()).unwrap();
        assert_eq!(
            fish_catch.length.map(|length| length.centimetres()),
            Some(Decimal::new(6230, 2))
        );

        let broken = FishCatchRow {
            weight_kg: Some(Decimal::new(-1, 0)),
            ..row
        };
        assert!(FishCatch::try_from(broken).is_err());
    }
}
