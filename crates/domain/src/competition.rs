use chrono::Duration;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::audit::{Audit, CommandContext, UserId};
use crate::category::{CompetitionCategory, NewCategory};
use crate::error::{DomainError, DomainResult, optional_text, validate_reason};
use crate::events::CompetitionEvent;
use crate::fish_catch::{FishCatch, NewFishCatch};
use crate::participant::{Participant, ParticipantRole};
use crate::status::{CompetitionStatus, StatusOperation};
use crate::value_objects::DateTimeRange;

pub type CompetitionId = i32;
pub type FisheryId = i32;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum CompetitionType {
    Public,
    Private,
}


/// Editable descriptive data of a competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionDetails {
    pub name: String,
    pub schedule: DateTimeRange,
    pub competition_type: CompetitionType,
    pub fishery_id: FisheryId,
    pub rules: Option<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
}

impl CompetitionDetails {
    pub const MAX_NAME_LEN: usize = 255;
    pub const MAX_RULES_LEN: usize = 5000;
    pub const MAX_IMAGE_REF_LEN: usize = 2048;

    /// Returns a trimmed copy, or the first field that breaks a constraint.
    fn normalized(self) -> DomainResult<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() || name.chars().count() > Self::MAX_NAME_LEN {
            return Err(DomainError::validation(
                "name",
                format!(
                    "Name must be between 1 and {} characters",
                    Self::MAX_NAME_LEN
                ),
            ));
        }
        let rules = optional_text("rules", self.rules.as_deref(), Self::MAX_RULES_LEN)?;
        let image_url = optional_text(
            "image_url",
            self.image_url.as_deref(),
            Self::MAX_IMAGE_REF_LEN,
        )?;
        let image_public_id = optional_text(
            "image_public_id",
            self.image_public_id.as_deref(),
            Self::MAX_IMAGE_REF_LEN,
        )?;

        Ok(Self {
            name,
            rules,
            image_url,
            image_public_id,
            ..self
        })
    }
}

/// Everything persisted for a competition, used to rebuild the aggregate
/// without replaying its operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionState {
    pub id: CompetitionId,
    pub organizer_id: UserId,
    pub details: CompetitionDetails,
    pub status: CompetitionStatus,
    pub status_reason: Option<String>,
    pub version: i32,
    pub audit: Audit,
    pub participants: Vec<Participant>,
    pub categories: Vec<CompetitionCategory>,
    pub fish_catches: Vec<FishCatch>,
}

/// Aggregate root for one fishing competition.
///
/// Every operation validates completely before assigning anything, so a
/// failed call leaves the competition untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Competition {
    id: CompetitionId,
    organizer_id: UserId,
    details: CompetitionDetails,
    status: CompetitionStatus,
    status_reason: Option<String>,
    version: i32,
    audit: Audit,
    participants: Vec<Participant>,
    categories: Vec<CompetitionCategory>,
    fish_catches: Vec<FishCatch>,
}

impl Competition {
    pub const MAX_REASON_LEN: usize = 500;
    /// Id of a competition that has not been stored yet.
    pub const UNSAVED_ID: CompetitionId = 0;

    pub fn upcoming_window() -> Duration {
        Duration::hours(24)
    }

    /// Slack around the schedule in which a catch may still be recorded.
    pub fn catch_time_tolerance() -> Duration {
        Duration::hours(1)
    }

    /// How far ahead of the clock a catch time may be.
    pub fn catch_clock_skew() -> Duration {
        Duration::minutes(5)
    }

    /// Creates a draft owned by `ctx.actor` with its primary scoring
    /// category and any number of special categories.
    pub fn create(
        details: CompetitionDetails,
        primary: NewCategory,
        specials: Vec<NewCategory>,
        ctx: &CommandContext,
    ) -> DomainResult<(Self, CompetitionEvent)> {
        let details = details.normalized()?;

        if !primary.is_primary_scoring {
            return Err(DomainError::validation(
                "primary_category",
                "A competition is created with a primary scoring category",
            ));
        }
        if specials.iter().any(|special| special.is_primary_scoring) {
            return Err(DomainError::validation(
                "special_categories",
                "Only one primary scoring category is allowed",
            ));
        }

        let mut categories = Vec::with_capacity(specials.len() + 1);
        categories.push(CompetitionCategory::configure(primary)?);
        for special in specials {
            categories.push(CompetitionCategory::configure(special)?);
        }

        let competition = Self {
            id: Self::UNSAVED_ID,
            organizer_id: ctx.actor,
            status: CompetitionStatus::Draft,
            status_reason: None,
            version: 0,
            audit: Audit::created(ctx),
            participants: Vec::new(),
            categories,
            fish_catches: Vec::new(),
            details,
        };
        let event = CompetitionEvent::CompetitionCreated {
            organizer_id: ctx.actor,
            name: competition.details.name.clone(),
        };

        Ok((competition, event))
    }

    pub fn restore(state: CompetitionState) -> Self {
        Self {
            id: state.id,
            organizer_id: state.organizer_id,
            details: state.details,
            status: state.status,
            status_reason: state.status_reason,
            version: state.version,
            audit: state.audit,
            participants: state.participants,
            categories: state.categories,
            fish_catches: state.fish_catches,
        }
    }

    /// Records the identity and version assigned by the store after a
    /// successful write.
    pub fn mark_persisted(&mut self, id: CompetitionId, version: i32) {
        self.id = id;
        self.version = version;
    }

    pub fn id(&self) -> CompetitionId {
        self.id
    }

    pub fn organizer_id(&self) -> UserId {
        self.organizer_id
    }

    pub fn is_organizer(&self, user_id: UserId) -> bool {
        self.organizer_id == user_id
    }

    pub fn details(&self) -> &CompetitionDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn schedule(&self) -> DateTimeRange {
        self.details.schedule
    }

    pub fn status(&self) -> CompetitionStatus {
        self.status
    }

    pub fn status_reason(&self) -> Option<&str> {
        self.status_reason.as_deref()
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn audit(&self) -> &Audit {
        &self.audit
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn categories(&self) -> &[CompetitionCategory] {
        &self.categories
    }

    pub fn fish_catches(&self) -> &[FishCatch] {
        &self.fish_catches
    }

    /// Enabled primary first, then specials by sort order.
    pub fn ordered_categories(&self) -> Vec<&CompetitionCategory> {
        let mut ordered: Vec<&CompetitionCategory> = self.categories.iter().collect();
        ordered.sort_by_key(|category| (!category.is_enabled_primary(), category.sort_order));
        ordered
    }

    pub fn primary_category(&self) -> Option<&CompetitionCategory> {
        self.categories
            .iter()
            .find(|category| category.is_enabled_primary())
    }

    pub fn participant(&self, participant_id: Uuid) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|participant| participant.id == participant_id)
    }

    pub fn participant_for_user(&self, user_id: UserId) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|participant| participant.user_id == Some(user_id))
    }

    pub fn fish_catch(&self, fish_catch_id: Uuid) -> Option<&FishCatch> {
        self.fish_catches
            .iter()
            .find(|fish_catch| fish_catch.id == fish_catch_id)
    }

    pub fn update_details(
        &mut self,
        details: CompetitionDetails,
        ctx: &CommandContext,
    ) -> DomainResult<CompetitionEvent> {
        self.ensure_editable("update_details")?;
        let details = details.normalized()?;

        self.details = details;
        self.audit.touch(ctx);
        Ok(CompetitionEvent::DetailsUpdated)
    }

    pub fn add_category(
        &mut self,
        new: NewCategory,
        ctx: &CommandContext,
    ) -> DomainResult<CompetitionEvent> {
        self.ensure_editable("add_category")?;
        if new.is_primary_scoring && self.primary_category().is_some() {
            return Err(DomainError::validation(
                "is_primary_scoring",
                "The competition already has an enabled primary scoring category",
            ));
        }
        let category = CompetitionCategory::configure(new)?;

        let event = CompetitionEvent::CategoryAdded {
            category_id: category.id,
            definition_id: category.definition.id(),
            is_primary_scoring: category.is_primary_scoring,
        };
        self.categories.push(category);
        self.audit.touch(ctx);
        Ok(event)
    }

    pub fn set_category_enabled(
        &mut self,
        category_id: Uuid,
        enabled: bool,
        ctx: &CommandContext,
    ) -> DomainResult<CompetitionEvent> {
        self.ensure_editable("set_category_enabled")?;
        let other_primary_enabled = self
            .categories
            .iter()
            .any(|category| category.id != category_id && category.is_enabled_primary());
        let category = self
            .categories
            .iter_mut()
            .find(|category| category.id == category_id)
            .ok_or_else(|| DomainError::not_found("Category", category_id))?;

        if enabled && category.is_primary_scoring && other_primary_enabled {
            return Err(DomainError::validation(
                "is_enabled",
                "Another primary scoring category is already enabled",
            ));
        }
        if !enabled
            && category.is_enabled_primary()
            && self.status != CompetitionStatus::Draft
        {
            return Err(DomainError::validation(
                "is_enabled",
                "The primary scoring category can only be disabled while the competition is a draft",
            ));
        }

        category.is_enabled = enabled;
        self.audit.touch(ctx);
        Ok(CompetitionEvent::CategoryToggled {
            category_id,
            is_enabled: enabled,
        })
    }

    pub fn request_approval(&mut self, ctx: &CommandContext) -> DomainResult<CompetitionEvent> {
        let to = self.status.apply(StatusOperation::RequestApproval)?;
        if self.primary_category().is_none() {
            return Err(DomainError::validation(
                "categories",
                "An enabled primary scoring category is required before requesting approval",
            ));
        }
        Ok(self.change_status(to, None, ctx))
    }

    pub fn approve_competition(&mut self, ctx: &CommandContext) -> DomainResult<CompetitionEvent> {
        let to = self.status.apply(StatusOperation::ApproveCompetition)?;
        Ok(self.change_status(to, None, ctx))
    }

    pub fn reject_approval(
        &mut self,
        reason: &str,
        ctx: &CommandContext,
    ) -> DomainResult<CompetitionEvent> {
        let to = self.status.apply(StatusOperation::RejectApproval)?;
        let reason = validate_reason("reason", reason, Self::MAX_REASON_LEN)?;
        Ok(self.change_status(to, Some(reason), ctx))
    }

    pub fn open_registrations(&mut self, ctx: &CommandContext) -> DomainResult<CompetitionEvent> {
        let to = self.status.apply(StatusOperation::OpenRegistrations)?;
        Ok(self.change_status(to, None, ctx))
    }

    pub fn schedule_competition(&mut self, ctx: &CommandContext) -> DomainResult<CompetitionEvent> {
        let to = self.status.apply(StatusOperation::ScheduleCompetition)?;
        Ok(self.change_status(to, None, ctx))
    }

    pub fn set_upcoming(&mut self, ctx: &CommandContext) -> DomainResult<CompetitionEvent> {
        let to = self.status.apply(StatusOperation::SetUpcoming)?;
        let until_start = self.details.schedule.start() - ctx.now;
        if until_start > Self::upcoming_window() {
            return Err(DomainError::validation(
                "schedule",
                "A competition becomes upcoming at most 24 hours before its start",
            ));
        }
        Ok(self.change_status(to, None, ctx))
    }

    pub fn reopen_registrations(&mut self, ctx: &CommandContext) -> DomainResult<CompetitionEvent> {
        let to = self.status.apply(StatusOperation::ReopenRegistrations)?;
        Ok(self.change_status(to, None, ctx))
    }

    pub fn start_competition(&mut self, ctx: &CommandContext) -> DomainResult<CompetitionEvent> {
        let to = self.status.apply(StatusOperation::StartCompetition)?;
        Ok(self.change_status(to, None, ctx))
    }

    pub fn finish_competition(&mut self, ctx: &CommandContext) -> DomainResult<CompetitionEvent> {
        let to = self.status.apply(StatusOperation::FinishCompetition)?;
        Ok(self.change_status(to, None, ctx))
    }

    pub fn cancel_competition(
        &mut self,
        reason: &str,
        ctx: &CommandContext,
    ) -> DomainResult<CompetitionEvent> {
        let to = self.status.apply(StatusOperation::CancelCompetition)?;
        let reason = validate_reason("reason", reason, Self::MAX_REASON_LEN)?;
        Ok(self.change_status(to, Some(reason), ctx))
    }

    /// Rolls the competition back to a draft. Only its organizer may do so.
    pub fn set_to_draft(
        &mut self,
        reason: Option<&str>,
        ctx: &CommandContext,
    ) -> DomainResult<CompetitionEvent> {
        let to = self.status.apply(StatusOperation::SetToDraft)?;
        if !self.is_organizer(ctx.actor) {
            return Err(DomainError::forbidden(
                "Only the organizer can move a competition back to draft",
            ));
        }
        let reason = optional_text("reason", reason, Self::MAX_REASON_LEN)?;
        Ok(self.change_status(to, reason, ctx))
    }

    fn change_status(
        &mut self,
        to: CompetitionStatus,
        reason: Option<String>,
        ctx: &CommandContext,
    ) -> CompetitionEvent {
        let from = self.status;
        self.status = to;
        self.status_reason = reason.clone();
        self.audit.touch(ctx);
        CompetitionEvent::StatusChanged { from, to, reason }
    }

    /// Self-registration of a user as a competitor.
    pub fn register_participant(
        &mut self,
        user_id: UserId,
        ctx: &CommandContext,
    ) -> DomainResult<CompetitionEvent> {
        if self.status != CompetitionStatus::AcceptingRegistrations {
            return Err(self.invalid_operation("register_participant"));
        }
        if self.is_organizer(user_id) {
            return Err(DomainError::validation(
                "user_id",
                "The organizer cannot register as a competitor",
            ));
        }
        self.ensure_not_participating(user_id)?;

        let participant = Participant::registered(user_id, ctx);
        Ok(self.push_participant(participant, ctx))
    }

    pub fn add_guest_participant(
        &mut self,
        name: &str,
        ctx: &CommandContext,
    ) -> DomainResult<CompetitionEvent> {
        if !matches!(
            self.status,
            CompetitionStatus::AcceptingRegistrations
                | CompetitionStatus::Scheduled
                | CompetitionStatus::Upcoming
        ) {
            return Err(self.invalid_operation("add_guest_participant"));
        }
        let participant = Participant::guest(name, ctx)?;
        Ok(self.push_participant(participant, ctx))
    }

    /// Appoints a judge or co-organizer.
    pub fn add_official(
        &mut self,
        user_id: UserId,
        role: ParticipantRole,
        ctx: &CommandContext,
    ) -> DomainResult<CompetitionEvent> {
        self.ensure_not_terminal("add_official")?;
        self.ensure_not_participating(user_id)?;
        let participant = Participant::official(user_id, role, ctx)?;
        Ok(self.push_participant(participant, ctx))
    }

    fn push_participant(&mut self, participant: Participant, ctx: &CommandContext) -> CompetitionEvent {
        let event = CompetitionEvent::ParticipantJoined {
            participant_id: participant.id,
            user_id: participant.user_id,
            role: participant.role,
            status: participant.status,
        };
        self.participants.push(participant);
        self.audit.touch(ctx);
        event
    }

    pub fn approve_participant(
        &mut self,
        participant_id: Uuid,
        ctx: &CommandContext,
    ) -> DomainResult<CompetitionEvent> {
        self.ensure_not_terminal("approve_participant")?;
        let participant = self.participant_mut(participant_id)?;
        participant.approve(ctx)?;
        let status = participant.status;

        self.audit.touch(ctx);
        Ok(CompetitionEvent::ParticipantReviewed {
            participant_id,
            status,
        })
    }

    pub fn reject_participant(
        &mut self,
        participant_id: Uuid,
        reason: &str,
        ctx: &CommandContext,
    ) -> DomainResult<CompetitionEvent> {
        self.ensure_not_terminal("reject_participant")?;
        let participant = self.participant_mut(participant_id)?;
        participant.reject(reason, ctx)?;
        let status = participant.status;

        self.audit.touch(ctx);
        Ok(CompetitionEvent::ParticipantReviewed {
            participant_id,
            status,
        })
    }

    pub fn assign_sector_stand(
        &mut self,
        participant_id: Uuid,
        sector: Option<&str>,
        stand: Option<&str>,
        ctx: &CommandContext,
    ) -> DomainResult<CompetitionEvent> {
        self.ensure_not_terminal("assign_sector_stand")?;
        let participant = self.participant_mut(participant_id)?;
        participant.assign_placement(sector, stand, ctx)?;
        let event = CompetitionEvent::ParticipantPlaced {
            participant_id,
            sector: participant.sector.clone(),
            stand: participant.stand.clone(),
        };

        self.audit.touch(ctx);
        Ok(event)
    }

    /// Appends a catch credited to an approved competitor. Only possible
    /// while the competition is running.
    pub fn record_fish_catch(
        &mut self,
        new: NewFishCatch,
        ctx: &CommandContext,
    ) -> DomainResult<(FishCatch, CompetitionEvent)> {
        if self.status != CompetitionStatus::Ongoing {
            return Err(self.invalid_operation("record_fish_catch"));
        }

        let participant = self
            .participant(new.participant_id)
            .ok_or_else(|| DomainError::not_found("Participant", new.participant_id))?;
        if participant.role != ParticipantRole::Competitor {
            return Err(DomainError::validation(
                "participant_id",
                "Catches can only be credited to competitors",
            ));
        }
        if !participant.is_approved() {
            return Err(DomainError::validation(
                "participant_id",
                "Catches can only be credited to approved competitors",
            ));
        }

        if !self
            .details
            .schedule
            .contains_with_tolerance(new.catch_time, Self::catch_time_tolerance())
        {
            return Err(DomainError::validation(
                "catch_time",
                "Catch time is outside the competition schedule",
            ));
        }
        if new.catch_time > ctx.now + Self::catch_clock_skew() {
            return Err(DomainError::validation(
                "catch_time",
                "Catch time cannot be in the future",
            ));
        }

        let fish_catch = FishCatch::record(new, ctx)?;
        let event = CompetitionEvent::FishCatchRecorded {
            fish_catch_id: fish_catch.id,
            participant_id: fish_catch.participant_id,
            judge_id: fish_catch.judge_id,
            catch_time: fish_catch.catch_time,
        };
        self.fish_catches.push(fish_catch.clone());
        self.audit.touch(ctx);
        Ok((fish_catch, event))
    }

    pub fn remove_fish_catch(
        &mut self,
        fish_catch_id: Uuid,
        ctx: &CommandContext,
    ) -> DomainResult<CompetitionEvent> {
        if !matches!(
            self.status,
            CompetitionStatus::Ongoing | CompetitionStatus::Finished
        ) {
            return Err(self.invalid_operation("remove_fish_catch"));
        }
        let position = self
            .fish_catches
            .iter()
            .position(|fish_catch| fish_catch.id == fish_catch_id)
            .ok_or_else(|| DomainError::not_found("FishCatch", fish_catch_id))?;

        self.fish_catches.remove(position);
        self.audit.touch(ctx);
        Ok(CompetitionEvent::FishCatchRemoved { fish_catch_id })
    }

    fn participant_mut(&mut self, participant_id: Uuid) -> DomainResult<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|participant| participant.id == participant_id)
            .ok_or_else(|| DomainError::not_found("Participant", participant_id))
    }

    fn ensure_not_participating(&self, user_id: UserId) -> DomainResult<()> {
        if self.participant_for_user(user_id).is_some() {
            return Err(DomainError::validation(
                "user_id",
                "User is already a participant of this competition",
            ));
        }
        Ok(())
    }

    fn ensure_editable(&self, operation: &'static str) -> DomainResult<()> {
        if !self.status.is_editable() {
            return Err(self.invalid_operation(operation));
        }
        Ok(())
    }

    fn ensure_not_terminal(&self, operation: &'static str) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(self.invalid_operation(operation));
        }
        Ok(())
    }

    fn invalid_operation(&self, operation: &'static str) -> DomainError {
        DomainError::InvalidOperation {
            operation,
            status: self.status,
        }
    }
}
