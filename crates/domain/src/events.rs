use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::UserId;
use crate::participant::{ParticipantRole, ParticipantStatus};
use crate::status::CompetitionStatus;

/// Facts produced by competition operations. Each operation returns its
/// event; the caller publishes them once the aggregate is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompetitionEvent {
    CompetitionCreated {
        organizer_id: UserId,
        name: String,
    },
    DetailsUpdated,
    StatusChanged {
        from: CompetitionStatus,
        to: CompetitionStatus,
        reason: Option<String>,
    },
    CategoryAdded {
        category_id: Uuid,
        definition_id: i32,
        is_primary_scoring: bool,
    },
    CategoryToggled {
        category_id: Uuid,
        is_enabled: bool,
    },
    ParticipantJoined {
        participant_id: Uuid,
        user_id: Option<UserId>,
        role: ParticipantRole,
        status: ParticipantStatus,
    },
    ParticipantReviewed {
        participant_id: Uuid,
        status: ParticipantStatus,
    },
    ParticipantPlaced {
        participant_id: Uuid,
        sector: Option<String>,
        stand: Option<String>,
    },
    FishCatchRecorded {
        fish_catch_id: Uuid,
        participant_id: Uuid,
        judge_id: UserId,
        catch_time: DateTime<Utc>,
    },
    FishCatchRemoved {
        fish_catch_id: Uuid,
    },
}

impl CompetitionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CompetitionCreated { .. } => "competition_created",
            Self::DetailsUpdated => "details_updated",
            Self::StatusChanged { .. } => "status_changed",
            Self::CategoryAdded { .. } => "category_added",
            Self::CategoryToggled { .. } => "category_toggled",
            Self::ParticipantJoined { .. } => "participant_joined",
            Self::ParticipantReviewed { .. } => "participant_reviewed",
            Self::ParticipantPlaced { .. } => "participant_placed",
            Self::FishCatchRecorded { .. } => "fish_catch_recorded",
            Self::FishCatchRemoved { .. } => "fish_catch_removed",
        }
    }
}
