//! Fishing competition domain model: the competition aggregate, its status
//! state machine, scoring categories, participants and recorded catches.

pub mod access;
pub mod audit;
pub mod category;
pub mod clock;
pub mod competition;
pub mod error;
pub mod events;
pub mod fish_catch;
pub mod participant;
pub mod status;
pub mod value_objects;

pub use access::{Actor, AdminOnly, ApprovalPolicy, OrganizerOrAdmin};
pub use audit::{Audit, CommandContext, UserId};
pub use category::{
    CalculationLogic, CategoryDefinition, CategoryDefinitionId, CategoryEntityType,
    CategoryMetric, CategoryType, CompetitionCategory, FishSpeciesId, NewCategory, ScoringRule,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use competition::{
    Competition, CompetitionDetails, CompetitionId, CompetitionState, CompetitionType, FisheryId,
};
pub use error::{DomainError, DomainResult, ErrorKind, parse_text};
pub use events::CompetitionEvent;
pub use fish_catch::{FishCatch, NewFishCatch};
pub use participant::{Participant, ParticipantRole, ParticipantStatus};
pub use status::{CompetitionStatus, StatusOperation};
pub use value_objects::{DateTimeRange, FishLength, FishWeight};
