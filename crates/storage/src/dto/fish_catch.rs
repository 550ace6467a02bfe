use chrono::{DateTime, Utc};
use domain::{FishCatch, FishLength, FishSpeciesId, FishWeight, NewFishCatch, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request payload for recording a catch. The judge is the caller.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_measurements"))]
pub struct RecordFishCatchRequest {
    pub participant_id: Uuid,

    pub fish_species_id: Option<FishSpeciesId>,

    pub catch_time: DateTime<Utc>,

    pub length_cm: Option<Decimal>,

    pub weight_kg: Option<Decimal>,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FishCatchResponse {
    pub fish_catch_id: Uuid,
    pub participant_id: Uuid,
    pub judge_id: Uuid,
    pub fish_species_id: Option<FishSpeciesId>,
    pub catch_time: DateTime<Utc>,
    pub length_cm: Option<Decimal>,
    pub weight_kg: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn validate_measurements(
    request: &RecordFishCatchRequest,
) -> Result<(), validator::ValidationError> {
    if request.length_cm.is_none() && request.weight_kg.is_none() {
        return Err(validator::ValidationError::new("missing_measurement")
            .with_message("Either length_cm or weight_kg is required".into()));
    }
    Ok(())
}

impl RecordFishCatchRequest {
    /// Converts the payload into domain input, checking measurement ranges.
    pub fn into_new_fish_catch(self, judge_id: UserId) -> domain::DomainResult<NewFishCatch> {
        Ok(NewFishCatch {
            participant_id: self.participant_id,
            judge_id,
            fish_species_id: self.fish_species_id,
            catch_time: self.catch_time,
            length: self.length_cm.map(FishLength::new).transpose()?,
            weight: self.weight_kg.map(FishWeight::new).transpose()?,
            notes: self.notes,
        })
    }
}

impl From<&FishCatch> for FishCatchResponse {
    fn from(fish_catch: &FishCatch) -> Self {
        Self {
            fish_catch_id: fish_catch.id,
            participant_id: fish_catch.participant_id,
            judge_id: fish_catch.judge_id,
            fish_species_id: fish_catch.fish_species_id,
            catch_time: fish_catch.catch_time,
            length_cm: fish_catch.length.map(|length| length.centimetres()),
            weight_kg: fish_catch.weight.map(|weight| weight.kilograms()),
            notes: fish_catch.notes.clone(),
            created_at: fish_catch.audit.created_at,
        }
    }
}
