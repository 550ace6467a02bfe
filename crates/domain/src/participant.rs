use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::audit::{Audit, CommandContext, UserId};
use crate::error::{DomainError, DomainResult, optional_text, validate_reason};

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
pub enum ParticipantRole {
    Competitor,
    Judge,
    Organizer,
}


impl ParticipantRole {
    pub fn is_official(&self) -> bool {
        matches!(self, Self::Judge | Self::Organizer)
    }
}

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
pub enum ParticipantStatus {
    Waiting,
    Approved,
    Rejected,
}


/// A person's registration in one competition. `user_id == None` marks a
/// guest known only by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub user_id: Option<UserId>,
    pub guest_name: Option<String>,
    pub role: ParticipantRole,
    pub status: ParticipantStatus,
    pub sector: Option<String>,
    pub stand: Option<String>,
    pub rejection_reason: Option<String>,
    pub audit: Audit,
}

impl Participant {
    pub const MAX_GUEST_NAME_LEN: usize = 100;
    pub const MAX_PLACEMENT_LEN: usize = 50;
    pub const MAX_REJECTION_REASON_LEN: usize = 500;

    /// A registered user asking to compete; waits for the organizer.
    pub fn registered(user_id: UserId, ctx: &CommandContext) -> Self {
        Self::new(
            Some(user_id),
            None,
            ParticipantRole::Competitor,
            ParticipantStatus::Waiting,
            ctx,
        )
    }

    /// A guest competitor entered by the organizer.
    pub fn guest(name: &str, ctx: &CommandContext) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > Self::MAX_GUEST_NAME_LEN {
            return Err(DomainError::validation(
                "guest_name",
                format!(
                    "Guest name must be between 1 and {} characters",
                    Self::MAX_GUEST_NAME_LEN
                ),
            ));
        }
        Ok(Self::new(
            None,
            Some(name.to_string()),
            ParticipantRole::Competitor,
            ParticipantStatus::Approved,
            ctx,
        ))
    }

    /// A judge or co-organizer appointed by the organizer.
    pub fn official(user_id: UserId, role: ParticipantRole, ctx: &CommandContext) -> DomainResult<Self> {
        if !role.is_official() {
            return Err(DomainError::validation(
                "role",
                "Officials must be judges or organizers",
            ));
        }
        Ok(Self::new(
            Some(user_id),
            None,
            role,
            ParticipantStatus::Approved,
            ctx,
        ))
    }

    fn new(
        user_id: Option<UserId>,
        guest_name: Option<String>,
        role: ParticipantRole,
        status: ParticipantStatus,
        ctx: &CommandContext,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            guest_name,
            role,
            status,
            sector: None,
            stand: None,
            rejection_reason: None,
            audit: Audit::created(ctx),
        }
    }

    pub fn is_guest(&self) -> bool {
        self.user_id.is_none()
    }

    pub fn is_approved(&self) -> bool {
        self.status == ParticipantStatus::Approved
    }

    /// Approved judge or organizer participant.
    pub fn is_active_official(&self) -> bool {
        self.role.is_official() && self.is_approved()
    }

    pub fn approve(&mut self, ctx: &CommandContext) -> DomainResult<()> {
        self.ensure_waiting(ParticipantStatus::Approved)?;
        self.status = ParticipantStatus::Approved;
        self.audit.touch(ctx);
        Ok(())
    }

    pub fn reject(&mut self, reason: &str, ctx: &CommandContext) -> DomainResult<()> {
        self.ensure_waiting(ParticipantStatus::Rejected)?;
        let reason = validate_reason("reason", reason, Self::MAX_REJECTION_REASON_LEN)?;
        self.status = ParticipantStatus::Rejected;
        self.rejection_reason = Some(reason);
        self.audit.touch(ctx);
        Ok(())
    }

    pub fn assign_placement(
        &mut self,
        sector: Option<&str>,
        stand: Option<&str>,
        ctx: &CommandContext,
    ) -> DomainResult<()> {
        let sector = optional_text("sector", sector, Self::MAX_PLACEMENT_LEN)?;
        let stand = optional_text("stand", stand, Self::MAX_PLACEMENT_LEN)?;
        self.sector = sector;
        self.stand = stand;
        self.audit.touch(ctx);
        Ok(())
    }

    fn ensure_waiting(&self, to: ParticipantStatus) -> DomainResult<()> {
        if self.status != ParticipantStatus::Waiting {
            return Err(DomainError::InvalidParticipantTransition {
                from: self.status,
                to,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ctx() -> CommandContext {
        CommandContext {
            actor: Uuid::from_u128(1),
            now: Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_registered_participant_waits() {
        let participant = Participant::registered(Uuid::from_u128(2), &ctx());
        assert_eq!(participant.role, ParticipantRole::Competitor);
        assert_eq!(participant.status, ParticipantStatus::Waiting);
        assert!(!participant.is_guest());
    }

    #[test]
    fn test_approve_twice_fails() {
        let mut participant = Participant::registered(Uuid::from_u128(2), &ctx());
        participant.approve(&ctx()).unwrap();
        assert_eq!(participant.status, ParticipantStatus::Approved);
        assert_eq!(participant.audit.last_modified_by, Some(Uuid::from_u128(1)));

        let err = participant.approve(&ctx()).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidParticipantTransition {
                from: ParticipantStatus::Approved,
                to: ParticipantStatus::Approved,
            }
        );
    }

    #[test]
    fn test_rejected_participant_cannot_be_approved() {
        let mut participant = Participant::registered(Uuid::from_u128(2), &ctx());
        participant.reject("nie spełnia wymagań", &ctx()).unwrap();
        assert_eq!(participant.status, ParticipantStatus::Rejected);
        assert_eq!(
            participant.rejection_reason.as_deref(),
            Some("nie spełnia wymagań")
        );

        assert!(participant.approve(&ctx()).is_err());
        assert_eq!(participant.status, ParticipantStatus::Rejected);
    }

    #[test]
    fn test_reject_requires_reason() {
        let mut participant = Participant::registered(Uuid::from_u128(2), &ctx());
        assert!(participant.reject("  ", &ctx()).is_err());
        assert_eq!(participant.status, ParticipantStatus::Waiting);
    }

    #[test]
    fn test_guest_is_approved_and_named() {
        let guest = Participant::guest("  Jan Kowalski ", &ctx()).unwrap();
        assert!(guest.is_guest());
        assert!(guest.is_approved());
        assert_eq!(guest.guest_name.as_deref(), Some("Jan Kowalski"));
        assert!(Participant::guest("", &ctx()).is_err());
    }

    #[test]
    fn test_official_roles() {
        let judge =
            Participant::official(Uuid::from_u128(3), ParticipantRole::Judge, &ctx()).unwrap();
        assert!(judge.is_active_official());
        assert!(
            Participant::official(Uuid::from_u128(3), ParticipantRole::Competitor, &ctx())
                .is_err()
        );
    }

    #[test]
    fn test_assign_placement() {
        let mut participant = Participant::guest("Anna", &ctx()).unwrap();
        participant
            .assign_placement(Some("A"), Some("12"), &ctx())
            .unwrap();
        assert_eq!(participant.sector.as_deref(), Some("A"));
        assert_eq!(participant.stand.as_deref(), Some("12"));

        let too_long = "x".repeat(51);
        assert!(
            participant
                .assign_placement(Some(&too_long), None, &ctx())
                .is_err()
        );
        assert_eq!(participant.sector.as_deref(), Some("A"));
    }
}
