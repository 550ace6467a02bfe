use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{Actor, CompetitionId};
use storage::dto::fish_catch::{FishCatchResponse, RecordFishCatchRequest};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/catches",
    params(
        ("id" = i32, Path, description = "Competition id")
    ),
    request_body = RecordFishCatchRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Catch recorded", body = FishCatchResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not a judge or organizer"),
        (status = 404, description = "Competition or participant not found"),
        (status = 409, description = "Competition is not running")
    ),
    tag = "catches"
)]
pub async fn record_fish_catch(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<CompetitionId>,
    Json(req): Json<RecordFishCatchRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let repositories = state.repositories();
    let fish_catch =
        services::record_fish_catch(&repositories.env(&state), &actor, id, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(FishCatchResponse::from(&fish_catch)),
    )
        .into_response())
}

#[utoipa::path(
    delete,
    path = "/api/competitions/{id}/catches/{fish_catch_id}",
    params(
        ("id" = i32, Path, description = "Competition id"),
        ("fish_catch_id" = Uuid, Path, description = "Fish catch id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Catch deleted"),
        (status = 403, description = "Caller may not delete this catch"),
        (status = 404, description = "Competition or catch not found"),
        (status = 409, description = "Catches cannot be removed in the current status")
    ),
    tag = "catches"
)]
pub async fn remove_fish_catch(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, fish_catch_id)): Path<(CompetitionId, Uuid)>,
) -> Result<Response, WebError> {
    let repositories = state.repositories();
    services::remove_fish_catch(&repositories.env(&state), &actor, id, fish_catch_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
