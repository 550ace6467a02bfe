//! Who may do what to a competition.
//!
//! The aggregate only compares identities it already holds. These checks
//! run in the caller before a domain operation, against an [`Actor`]
//! resolved from the request.

use crate::audit::UserId;
use crate::competition::Competition;
use crate::error::{DomainError, DomainResult};
use crate::fish_catch::FishCatch;

/// The resolved identity behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub is_admin: bool,
}

impl Actor {
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }
}

/// Decides who may approve or reject a competition's approval request.
pub trait ApprovalPolicy: Send + Sync {
    fn can_review(&self, competition: &Competition, actor: &Actor) -> bool;
}

/// Administrators, and also the competition's own organizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganizerOrAdmin;

impl ApprovalPolicy for OrganizerOrAdmin {
    fn can_review(&self, competition: &Competition, actor: &Actor) -> bool {
        actor.is_admin || competition.is_organizer(actor.user_id)
    }
}

/// Administrators only.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminOnly;

impl ApprovalPolicy for AdminOnly {
    fn can_review(&self, _competition: &Competition, actor: &Actor) -> bool {
        actor.is_admin
    }
}

pub fn ensure_organizer(competition: &Competition, actor: &Actor) -> DomainResult<()> {
    if competition.is_organizer(actor.user_id) {
        Ok(())
    } else {
        Err(DomainError::forbidden(
            "Only the competition organizer can perform this operation",
        ))
    }
}

pub fn ensure_can_review(
    policy: &dyn ApprovalPolicy,
    competition: &Competition,
    actor: &Actor,
) -> DomainResult<()> {
    if policy.can_review(competition, actor) {
        Ok(())
    } else {
        Err(DomainError::forbidden(
            "Not allowed to review this competition's approval request",
        ))
    }
}

/// The organizer, or an approved judge/organizer participant.
pub fn ensure_can_record_catch(competition: &Competition, actor: &Actor) -> DomainResult<()> {
    if competition.is_organizer(actor.user_id) || is_active_official(competition, actor) {
        Ok(())
    } else {
        Err(DomainError::forbidden(
            "Only judges or organizers can record catches",
        ))
    }
}

/// The organizer, the judge who recorded the catch, or any approved
/// judge/organizer participant.
pub fn ensure_can_delete_catch(
    competition: &Competition,
    fish_catch: &FishCatch,
    actor: &Actor,
) -> DomainResult<()> {
    if competition.is_organizer(actor.user_id)
        || fish_catch.judge_id == actor.user_id
        || is_active_official(competition, actor)
    {
        Ok(())
    } else {
        Err(DomainError::forbidden(
            "Only the organizer, the recording judge or a current judge can delete this catch",
        ))
    }
}

fn is_active_official(competition: &Competition, actor: &Actor) -> bool {
    competition
        .participant_for_user(actor.user_id)
        .is_some_and(|participant| participant.is_active_official())
}
