//! Competition lifecycle states and the table of allowed status operations.
//!
//! ```text
//! Draft -> PendingApproval -> AcceptingRegistrations -> Scheduled -> Upcoming -> Ongoing -> Finished
//! ```
//!
//! `Cancelled` is reachable from every non-terminal state, and `SetToDraft`
//! rolls a competition back from the pre-start states.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::error::{DomainError, DomainResult};

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
pub enum CompetitionStatus {
    Draft,
    PendingApproval,
    AcceptingRegistrations,
    Scheduled,
    Upcoming,
    Ongoing,
    Finished,
    Cancelled,
}


impl CompetitionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }

    /// Whether competition details and categories may still be edited.
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            Self::Draft | Self::PendingApproval | Self::AcceptingRegistrations | Self::Scheduled
        )
    }

    /// Applies `operation`, returning the resulting status or the failed
    /// transition.
    pub fn apply(self, operation: StatusOperation) -> DomainResult<CompetitionStatus> {
        if operation.is_valid_from(self) {
            Ok(operation.target())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self,
                to: operation.target(),
            })
        }
    }
}

/// Every named operation that changes a competition's status.
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
pub enum StatusOperation {
    RequestApproval,
    ApproveCompetition,
    RejectApproval,
    OpenRegistrations,
    ScheduleCompetition,
    SetUpcoming,
    ReopenRegistrations,
    StartCompetition,
    FinishCompetition,
    CancelCompetition,
    SetToDraft,
}


impl StatusOperation {
    pub fn target(&self) -> CompetitionStatus {
        use CompetitionStatus::*;

        match self {
            Self::RequestApproval => PendingApproval,
            Self::ApproveCompetition => AcceptingRegistrations,
            Self::RejectApproval => Draft,
            Self::OpenRegistrations => AcceptingRegistrations,
            Self::ScheduleCompetition => Scheduled,
            Self::SetUpcoming => Upcoming,
            Self::ReopenRegistrations => AcceptingRegistrations,
            Self::StartCompetition => Ongoing,
            Self::FinishCompetition => Finished,
            Self::CancelCompetition => Cancelled,
            Self::SetToDraft => Draft,
        }
    }

    pub fn is_valid_from(&self, from: CompetitionStatus) -> bool {
        use CompetitionStatus::*;

        match self {
            Self::RequestApproval => from == Draft,
            Self::ApproveCompetition | Self::RejectApproval => from == PendingApproval,
            Self::OpenRegistrations | Self::ReopenRegistrations => {
                matches!(from, Scheduled | Upcoming)
            }
            Self::ScheduleCompetition => from == AcceptingRegistrations,
            Self::SetUpcoming => from == Scheduled,
            Self::StartCompetition => matches!(from, Scheduled | Upcoming),
            Self::FinishCompetition => from == Ongoing,
            Self::CancelCompetition => !from.is_terminal(),
            Self::SetToDraft => matches!(
                from,
                PendingApproval | AcceptingRegistrations | Scheduled | Upcoming
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_terminal_states_reject_every_operation() {
        for status in [CompetitionStatus::Finished, CompetitionStatus::Cancelled] {
            for operation in StatusOperation::iter() {
                assert!(
                    status.apply(operation).is_err(),
                    "{:?} should not be allowed from {:?}",
                    operation,
                    status
                );
            }
        }
    }

    #[test]
    fn test_cancel_from_every_non_terminal_state() {
        for status in CompetitionStatus::iter().filter(|s| !s.is_terminal()) {
            assert_eq!(
                status.apply(StatusOperation::CancelCompetition).unwrap(),
                CompetitionStatus::Cancelled
            );
        }
    }

    #[test]
    fn test_happy_path() {
        let mut status = CompetitionStatus::Draft;
        for operation in [
            StatusOperation::RequestApproval,
            StatusOperation::ApproveCompetition,
            StatusOperation::ScheduleCompetition,
            StatusOperation::SetUpcoming,
            StatusOperation::StartCompetition,
            StatusOperation::FinishCompetition,
        ] {
            status = status.apply(operation).unwrap();
        }
        assert_eq!(status, CompetitionStatus::Finished);
    }

    #[test]
    fn test_open_registrations_is_a_reopen_path() {
        assert!(
            CompetitionStatus::AcceptingRegistrations
                .apply(StatusOperation::OpenRegistrations)
                .is_err()
        );
        assert!(
            CompetitionStatus::Draft
                .apply(StatusOperation::OpenRegistrations)
                .is_err()
        );
        assert_eq!(
            CompetitionStatus::Upcoming
                .apply(StatusOperation::OpenRegistrations)
                .unwrap(),
            CompetitionStatus::AcceptingRegistrations
        );
    }

    #[test]
    fn test_set_to_draft_sources() {
        use CompetitionStatus::*;

        for status in [PendingApproval, AcceptingRegistrations, Scheduled, Upcoming] {
            assert_eq!(status.apply(StatusOperation::SetToDraft).unwrap(), Draft);
        }
        for status in [Draft, Ongoing, Finished, Cancelled] {
            assert!(status.apply(StatusOperation::SetToDraft).is_err());
        }
    }

    #[test]
    fn test_invalid_transition_names_both_states() {
        let err = CompetitionStatus::Draft
            .apply(StatusOperation::StartCompetition)
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidStatusTransition {
                from: CompetitionStatus::Draft,
                to: CompetitionStatus::Ongoing,
            }
        );
    }

    #[test]
    fn test_status_parsing() {
        for status in CompetitionStatus::iter() {
            assert_eq!(
                CompetitionStatus::from_str(&status.to_string()).unwrap(),
                status
            );
        }
        assert_eq!(
            CompetitionStatus::PendingApproval.to_string(),
            "pending_approval"
        );
        assert!(CompetitionStatus::from_str("live").is_err());

        assert_eq!(
            StatusOperation::from_str("reopen_registrations").unwrap(),
            StatusOperation::ReopenRegistrations
        );
        assert!(StatusOperation::from_str("publish").is_err());
    }

    #[test]
    fn test_editable_states() {
        assert!(CompetitionStatus::Scheduled.is_editable());
        assert!(!CompetitionStatus::Upcoming.is_editable());
        assert!(!CompetitionStatus::Ongoing.is_editable());
        assert!(!CompetitionStatus::Finished.is_editable());
    }
}
