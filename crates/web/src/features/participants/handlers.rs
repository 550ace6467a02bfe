use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{Actor, CompetitionId};
use storage::dto::{
    competition::CompetitionResponse,
    participant::{
        AddGuestRequest, AddOfficialRequest, AssignPlacementRequest, RejectParticipantRequest,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/participants/register",
    params(
        ("id" = i32, Path, description = "Competition id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Registered, waiting for approval", body = CompetitionResponse),
        (status = 400, description = "Already participating, or the caller is the organizer"),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "Registrations are closed")
    ),
    tag = "participants"
)]
pub async fn register(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<CompetitionId>,
) -> Result<Response, WebError> {
    let repositories = state.repositories();
    let competition = services::register(&repositories.env(&state), &actor, id).await?;

    Ok((
        StatusCode::CREATED,
        Json(CompetitionResponse::from(&competition)),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/participants/guests",
    params(
        ("id" = i32, Path, description = "Competition id")
    ),
    request_body = AddGuestRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Guest added", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 409, description = "Guests cannot be added in the current status")
    ),
    tag = "participants"
)]
pub async fn add_guest(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<CompetitionId>,
    Json(req): Json<AddGuestRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let repositories = state.repositories();
    let competition = services::add_guest(&repositories.env(&state), &actor, id, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CompetitionResponse::from(&competition)),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/participants/officials",
    params(
        ("id" = i32, Path, description = "Competition id")
    ),
    request_body = AddOfficialRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Judge or organizer appointed", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 409, description = "Competition is finished or cancelled")
    ),
    tag = "participants"
)]
pub async fn add_official(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<CompetitionId>,
    Json(req): Json<AddOfficialRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let repositories = state.repositories();
    let competition =
        services::add_official(&repositories.env(&state), &actor, id, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CompetitionResponse::from(&competition)),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/participants/{participant_id}/approve",
    params(
        ("id" = i32, Path, description = "Competition id"),
        ("participant_id" = Uuid, Path, description = "Participant id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Participant approved", body = CompetitionResponse),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Competition or participant not found"),
        (status = 409, description = "Participant is not waiting for review")
    ),
    tag = "participants"
)]
pub async fn approve(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, participant_id)): Path<(CompetitionId, Uuid)>,
) -> Result<Response, WebError> {
    let repositories = state.repositories();
    let competition =
        services::approve(&repositories.env(&state), &actor, id, participant_id).await?;

    Ok(Json(CompetitionResponse::from(&competition)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/participants/{participant_id}/reject",
    params(
        ("id" = i32, Path, description = "Competition id"),
        ("participant_id" = Uuid, Path, description = "Participant id")
    ),
    request_body = RejectParticipantRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Participant rejected", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Competition or participant not found"),
        (status = 409, description = "Participant is not waiting for review")
    ),
    tag = "participants"
)]
pub async fn reject(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, participant_id)): Path<(CompetitionId, Uuid)>,
    Json(req): Json<RejectParticipantRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let repositories = state.repositories();
    let competition =
        services::reject(&repositories.env(&state), &actor, id, participant_id, &req).await?;

    Ok(Json(CompetitionResponse::from(&competition)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/competitions/{id}/participants/{participant_id}/placement",
    params(
        ("id" = i32, Path, description = "Competition id"),
        ("participant_id" = Uuid, Path, description = "Participant id")
    ),
    request_body = AssignPlacementRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Sector and stand assigned", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Competition or participant not found")
    ),
    tag = "participants"
)]
pub async fn assign_placement(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, participant_id)): Path<(CompetitionId, Uuid)>,
    Json(req): Json<AssignPlacementRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let repositories = state.repositories();
    let competition = services::assign_placement(
        &repositories.env(&state),
        &actor,
        id,
        participant_id,
        &req,
    )
    .await?;

    Ok(Json(CompetitionResponse::from(&competition)).into_response())
}
