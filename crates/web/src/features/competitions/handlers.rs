use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{Actor, CompetitionId};
use storage::dto::competition::{
    AddCategoryRequest, CompetitionResponse, CreateCompetitionRequest, SetCategoryEnabledRequest,
    StatusChangeRequest, UpdateCompetitionRequest,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions/{id}",
    params(
        ("id" = i32, Path, description = "Competition id")
    ),
    responses(
        (status = 200, description = "Competition found", body = CompetitionResponse),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn get_competition(
    State(state): State<AppState>,
    Path(id): Path<CompetitionId>,
) -> Result<Response, WebError> {
    let repositories = state.repositories();
    let competition = services::get_competition(&repositories.env(&state), id).await?;

    Ok(Json(CompetitionResponse::from(&competition)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions",
    request_body = CreateCompetitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Competition created as a draft", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "competitions"
)]
pub async fn create_competition(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateCompetitionRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    req.validate_schedule()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let repositories = state.repositories();
    let competition =
        services::create_competition(&repositories.env(&state), &actor, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CompetitionResponse::from(&competition)),
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/api/competitions/{id}",
    params(
        ("id" = i32, Path, description = "Competition id")
    ),
    request_body = UpdateCompetitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Competition updated successfully", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "Details are locked in the current status, or a concurrent update")
    ),
    tag = "competitions"
)]
pub async fn update_competition(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<CompetitionId>,
    Json(update_req): Json<UpdateCompetitionRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let repositories = state.repositories();
    let updated =
        services::update_competition(&repositories.env(&state), &actor, id, &update_req).await?;

    Ok(Json(CompetitionResponse::from(&updated)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/categories",
    params(
        ("id" = i32, Path, description = "Competition id")
    ),
    request_body = AddCategoryRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Category added", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "Categories are locked in the current status")
    ),
    tag = "competitions"
)]
pub async fn add_category(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<CompetitionId>,
    Json(req): Json<AddCategoryRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let repositories = state.repositories();
    let competition =
        services::add_category(&repositories.env(&state), &actor, id, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CompetitionResponse::from(&competition)),
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/api/competitions/{id}/categories/{category_id}/enabled",
    params(
        ("id" = i32, Path, description = "Competition id"),
        ("category_id" = Uuid, Path, description = "Competition category id")
    ),
    request_body = SetCategoryEnabledRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Category toggled", body = CompetitionResponse),
        (status = 400, description = "Another primary category is enabled"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Competition or category not found")
    ),
    tag = "competitions"
)]
pub async fn set_category_enabled(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((id, category_id)): Path<(CompetitionId, Uuid)>,
    Json(req): Json<SetCategoryEnabledRequest>,
) -> Result<Response, WebError> {
    let repositories = state.repositories();
    let competition = services::set_category_enabled(
        &repositories.env(&state),
        &actor,
        id,
        category_id,
        req.is_enabled,
    )
    .await?;

    Ok(Json(CompetitionResponse::from(&competition)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/status",
    params(
        ("id" = i32, Path, description = "Competition id")
    ),
    request_body = StatusChangeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Status changed", body = CompetitionResponse),
        (status = 400, description = "Validation error or unmet guard"),
        (status = 403, description = "Caller may not perform this operation"),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "Transition not allowed from the current status")
    ),
    tag = "competitions"
)]
pub async fn change_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<CompetitionId>,
    Json(req): Json<StatusChangeRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let repositories = state.repositories();
    let competition =
        services::change_status(&repositories.env(&state), &actor, id, &req).await?;

    Ok(Json(CompetitionResponse::from(&competition)).into_response())
}
