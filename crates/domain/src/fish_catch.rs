use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::{Audit, CommandContext, UserId};
use crate::category::FishSpeciesId;
use crate::error::{DomainError, DomainResult, optional_text};
use crate::value_objects::{FishLength, FishWeight};

/// Input for recording a catch.
#[derive(Debug, Clone)]
pub struct NewFishCatch {
    pub participant_id: Uuid,
    pub judge_id: UserId,
    pub fish_species_id: Option<FishSpeciesId>,
    pub catch_time: DateTime<Utc>,
    pub length: Option<FishLength>,
    pub weight: Option<FishWeight>,
    pub notes: Option<String>,
}

/// A recorded catch. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishCatch {
    pub id: Uuid,
    pub participant_id: Uuid,
    pub judge_id: UserId,
    pub fish_species_id: Option<FishSpeciesId>,
    pub catch_time: DateTime<Utc>,
    pub length: Option<FishLength>,
    pub weight: Option<FishWeight>,
    pub notes: Option<String>,
    pub audit: Audit,
}

impl FishCatch {
    pub const MAX_NOTES_LEN: usize = 1000;

    pub(crate) fn record(new: NewFishCatch, ctx: &CommandContext) -> DomainResult<Self> {
        if new.length.is_none() && new.weight.is_none() {
            return Err(DomainError::validation(
                "measurements",
                "A catch needs a length, a weight or both",
            ));
        }
        let notes = optional_text("notes", new.notes.as_deref(), Self::MAX_NOTES_LEN)?;

        Ok(Self {
            id: Uuid::new_v4(),
            participant_id: new.participant_id,
            judge_id: new.judge_id,
            fish_species_id: new.fish_species_id,
            catch_time: new.catch_time,
            length: new.length,
            weight: new.weight,
            notes,
            audit: Audit::created(ctx),
        })
    }
}
