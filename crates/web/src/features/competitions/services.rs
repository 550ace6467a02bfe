use domain::{
    Actor, Competition, CompetitionId, DomainError, NewCategory, StatusOperation,
    access::{ensure_can_review, ensure_organizer},
};
use storage::{
    StorageError,
    dto::competition::{
        AddCategoryRequest, CategoryRequest, CreateCompetitionRequest, StatusChangeRequest,
        UpdateCompetitionRequest,
    },
};
use uuid::Uuid;

use crate::error::WebResult;
use crate::state::CommandEnv;

/// Get competition by id
pub async fn get_competition(env: &CommandEnv<'_>, id: CompetitionId) -> WebResult<Competition> {
    env.load(id).await
}

/// Create a new draft competition owned by the caller
pub async fn create_competition(
    env: &CommandEnv<'_>,
    actor: &Actor,
    request: &CreateCompetitionRequest,
) -> WebResult<Competition> {
    ensure_fishery_exists(env, request.fishery_id).await?;

    let primary = resolve_category(env, &request.primary_category, true, 0).await?;
    let mut specials = Vec::with_capacity(request.special_categories.len());
    for (position, special) in request.special_categories.iter().enumerate() {
        let default_sort = position as i32 + 1;
        specials.push(resolve_category(env, special, false, default_sort).await?);
    }

    let ctx = env.context(actor);
    let (mut competition, event) =
        Competition::create(request.details()?, primary, specials, &ctx)?;
    env.commit_new(&mut competition, event).await?;

    Ok(competition)
}

/// Update descriptive details
pub async fn update_competition(
    env: &CommandEnv<'_>,
    actor: &Actor,
    id: CompetitionId,
    request: &UpdateCompetitionRequest,
) -> WebResult<Competition> {
    let mut competition = env.load(id).await?;
    ensure_organizer(&competition, actor)?;

    let details = request.apply_to(competition.details())?;
    if details.fishery_id != competition.details().fishery_id {
        ensure_fishery_exists(env, details.fishery_id).await?;
    }

    let event = competition.update_details(details, &env.context(actor))?;
    env.commit(&mut competition, event).await?;

    Ok(competition)
}

/// Attach another category; specials default to the slot after the last one
pub async fn add_category(
    env: &CommandEnv<'_>,
    actor: &Actor,
    id: CompetitionId,
    request: &AddCategoryRequest,
) -> WebResult<Competition> {
    let mut competition = env.load(id).await?;
    ensure_organizer(&competition, actor)?;

    let next_sort = competition
        .categories()
        .iter()
        .map(|category| category.sort_order)
        .max()
        .unwrap_or(0)
        + 1;
    let new = resolve_category(env, &request.category, request.is_primary_scoring, next_sort)
        .await?;

    let event = competition.add_category(new, &env.context(actor))?;
    env.commit(&mut competition, event).await?;

    Ok(competition)
}

pub async fn set_category_enabled(
    env: &CommandEnv<'_>,
    actor: &Actor,
    id: CompetitionId,
    category_id: Uuid,
    enabled: bool,
) -> WebResult<Competition> {
    let mut competition = env.load(id).await?;
    ensure_organizer(&competition, actor)?;

    let event = competition.set_category_enabled(category_id, enabled, &env.context(actor))?;
    env.commit(&mut competition, event).await?;

    Ok(competition)
}

/// Run one lifecycle operation
pub async fn change_status(
    env: &CommandEnv<'_>,
    actor: &Actor,
    id: CompetitionId,
    request: &StatusChangeRequest,
) -> WebResult<Competition> {
    let operation = request.operation()?;
    let mut competition = env.load(id).await?;

    match operation {
        StatusOperation::ApproveCompetition | StatusOperation::RejectApproval => {
            ensure_can_review(env.approval_policy, &competition, actor)?
        }
        _ => ensure_organizer(&competition, actor)?,
    }

    let ctx = env.context(actor);
    let reason = request.reason.as_deref();
    let event = match operation {
        StatusOperation::RequestApproval => competition.request_approval(&ctx),
        StatusOperation::ApproveCompetition => competition.approve_competition(&ctx),
        StatusOperation::RejectApproval => {
            competition.reject_approval(reason.unwrap_or_default(), &ctx)
        }
        StatusOperation::OpenRegistrations => competition.open_registrations(&ctx),
        StatusOperation::ScheduleCompetition => competition.schedule_competition(&ctx),
        StatusOperation::SetUpcoming => competition.set_upcoming(&ctx),
        StatusOperation::ReopenRegistrations => competition.reopen_registrations(&ctx),
        StatusOperation::StartCompetition => competition.start_competition(&ctx),
        StatusOperation::FinishCompetition => competition.finish_competition(&ctx),
        StatusOperation::CancelCompetition => {
            competition.cancel_competition(reason.unwrap_or_default(), &ctx)
        }
        StatusOperation::SetToDraft => competition.set_to_draft(reason, &ctx),
    }?;
    env.commit(&mut competition, event).await?;

    Ok(competition)
}

async fn resolve_category(
    env: &CommandEnv<'_>,
    request: &CategoryRequest,
    is_primary_scoring: bool,
    default_sort: i32,
) -> WebResult<NewCategory> {
    let definition = match env.catalog.find_category_definition(request.definition_id).await {
        Ok(definition) => definition,
        Err(StorageError::NotFound) => {
            return Err(DomainError::validation(
                "definition_id",
                format!("Unknown category definition {}", request.definition_id),
            )
            .into());
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(species) = request.fish_species_id {
        ensure_fish_species_exists(env, species).await?;
    }

    Ok(NewCategory {
        definition,
        is_primary_scoring,
        fish_species_id: request.fish_species_id,
        custom_name_override: request.custom_name_override.clone(),
        sort_order: if is_primary_scoring {
            0
        } else {
            request.sort_order.unwrap_or(default_sort)
        },
    })
}

async fn ensure_fishery_exists(env: &CommandEnv<'_>, fishery_id: i32) -> WebResult<()> {
    if !env.catalog.fishery_exists(fishery_id).await? {
        return Err(
            DomainError::validation("fishery_id", format!("Unknown fishery {}", fishery_id))
                .into(),
        );
    }
    Ok(())
}

pub(crate) async fn ensure_fish_species_exists(
    env: &CommandEnv<'_>,
    fish_species_id: i32,
) -> WebResult<()> {
    if !env.catalog.fish_species_exists(fish_species_id).await? {
        return Err(DomainError::validation(
            "fish_species_id",
            format!("Unknown fish species {}", fish_species_id),
        )
        .into());
    }
    Ok(())
}
