use domain::{Actor, Competition, CompetitionId, access::ensure_organizer};
use storage::dto::participant::{
    AddGuestRequest, AddOfficialRequest, AssignPlacementRequest, RejectParticipantRequest,
};
use uuid::Uuid;

use crate::error::WebResult;
use crate::state::CommandEnv;

/// Register the caller as a competitor awaiting approval
pub async fn register(
    env: &CommandEnv<'_>,
    actor: &Actor,
    id: CompetitionId,
) -> WebResult<Competition> {
    let mut competition = env.load(id).await?;

    let event = competition.register_participant(actor.user_id, &env.context(actor))?;
    env.commit(&mut competition, event).await?;

    Ok(competition)
}

pub async fn add_guest(
    env: &CommandEnv<'_>,
    actor: &Actor,
    id: CompetitionId,
    request: &AddGuestRequest,
) -> WebResult<Competition> {
    let mut competition = env.load(id).await?;
    ensure_organizer(&competition, actor)?;

    let event = competition.add_guest_participant(&request.name, &env.context(actor))?;
    env.commit(&mut competition, event).await?;

    Ok(competition)
}

pub async fn add_official(
    env: &CommandEnv<'_>,
    actor: &Actor,
    id: CompetitionId,
    request: &AddOfficialRequest,
) -> WebResult<Competition> {
    let mut competition = env.load(id).await?;
    ensure_organizer(&competition, actor)?;

    let event =
        competition.add_official(request.user_id, request.role()?, &env.context(actor))?;
    env.commit(&mut competition, event).await?;

    Ok(competition)
}

pub async fn approve(
    env: &CommandEnv<'_>,
    actor: &Actor,
    id: CompetitionId,
    participant_id: Uuid,
) -> WebResult<Competition> {
    let mut competition = env.load(id).await?;
    ensure_organizer(&competition, actor)?;

    let event = competition.approve_participant(participant_id, &env.context(actor))?;
    env.commit(&mut competition, event).await?;

    Ok(competition)
}

pub async fn reject(
    env: &CommandEnv<'_>,
    actor: &Actor,
    id: CompetitionId,
    participant_id: Uuid,
    request: &RejectParticipantRequest,
) -> WebResult<Competition> {
    let mut competition = env.load(id).await?;
    ensure_organizer(&competition, actor)?;

    let event =
        competition.reject_participant(participant_id, &request.reason, &env.context(actor))?;
    env.commit(&mut competition, event).await?;

    Ok(competition)
}

/// Set or clear the participant's sector and stand
pub async fn assign_placement(
    env: &CommandEnv<'_>,
    actor: &Actor,
    id: CompetitionId,
    participant_id: Uuid,
    request: &AssignPlacementRequest,
) -> WebResult<Competition> {
    let mut competition = env.load(id).await?;
    ensure_organizer(&competition, actor)?;

    let event = competition.assign_sector_stand(
        participant_id,
        request.sector.as_deref(),
        request.stand.as_deref(),
        &env.context(actor),
    )?;
    env.commit(&mut competition, event).await?;

    Ok(competition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WebError;
    use crate::state::test_support::*;
    use domain::{ErrorKind, ParticipantRole, ParticipantStatus};

    fn kind(error: WebError) -> ErrorKind {
        match error {
            WebError::Domain(e) => e.kind(),
            other => panic!("expected a domain error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_registration_and_review() {
        let test = TestEnv::new();
        accepting_registrations(&test).await;

        let competition = register(&test.env(), &angler(), 1).await.unwrap();
        let participant = competition
            .participant_for_user(angler().user_id)
            .unwrap()
            .clone();
        assert_eq!(participant.status, ParticipantStatus::Waiting);

        let err = register(&test.env(), &angler(), 1).await.unwrap_err();
        assert_eq!(kind(err), ErrorKind::DomainValidation);

        let err = approve(&test.env(), &angler(), 1, participant.id)
            .await
            .unwrap_err();
        assert_eq!(kind(err), ErrorKind::Forbidden);

        let reason = RejectParticipantRequest {
            reason: "nie spełnia wymagań".to_string(),
        };
        let competition = reject(&test.env(), &organizer(), 1, participant.id, &reason)
            .await
            .unwrap();
        let rejected = competition.participant(participant.id).unwrap();
        assert_eq!(rejected.status, ParticipantStatus::Rejected);
        assert_eq!(
            rejected.rejection_reason.as_deref(),
            Some("nie spełnia wymagań")
        );

        let err = approve(&test.env(), &organizer(), 1, participant.id)
            .await
            .unwrap_err();
        assert_eq!(kind(err), ErrorKind::InvalidStateTransition);
    }

    #[tokio::test]
    async fn test_registration_closed_in_draft() {
        let test = TestEnv::new();
        crate::features::competitions::services::create_competition(
            &test.env(),
            &organizer(),
            &create_request(),
        )
        .await
        .unwrap();

        let err = register(&test.env(), &angler(), 1).await.unwrap_err();
        assert_eq!(kind(err), ErrorKind::InvalidStateTransition);
    }

    #[tokio::test]
    async fn test_guests_officials_and_placement() {
        let test = TestEnv::new();
        accepting_registrations(&test).await;

        let guest = AddGuestRequest {
            name: "Jan Kowalski".to_string(),
        };
        let competition = add_guest(&test.env(), &organizer(), 1, &guest).await.unwrap();
        let guest_id = competition.participants()[0].id;
        assert!(competition.participants()[0].is_approved());

        let official = AddOfficialRequest {
            user_id: judge().user_id,
            role: "judge".to_string(),
        };
        let competition = add_official(&test.env(), &organizer(), 1, &official)
            .await
            .unwrap();
        let appointed = competition.participant_for_user(judge().user_id).unwrap();
        assert_eq!(appointed.role, ParticipantRole::Judge);
        assert!(appointed.is_active_official());

        let placement = AssignPlacementRequest {
            sector: Some("C".to_string()),
            stand: Some("12".to_string()),
        };
        let competition = assign_placement(&test.env(), &organizer(), 1, guest_id, &placement)
            .await
            .unwrap();
        let placed = competition.participant(guest_id).unwrap();
        assert_eq!(placed.sector.as_deref(), Some("C"));
        assert_eq!(placed.stand.as_deref(), Some("12"));

        let err = assign_placement(&test.env(), &organizer(), 1, Uuid::nil(), &placement)
            .await
            .unwrap_err();
        assert_eq!(kind(err), ErrorKind::NotFound);
    }
}
