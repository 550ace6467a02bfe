use domain::{
    Actor, CompetitionId, DomainError, FishCatch,
    access::{ensure_can_delete_catch, ensure_can_record_catch},
};
use storage::dto::fish_catch::RecordFishCatchRequest;
use uuid::Uuid;

use crate::error::WebResult;
use crate::features::competitions::services::ensure_fish_species_exists;
use crate::state::CommandEnv;

/// Record a catch; the caller is stored as the judge
pub async fn record_fish_catch(
    env: &CommandEnv<'_>,
    actor: &Actor,
    id: CompetitionId,
    request: RecordFishCatchRequest,
) -> WebResult<FishCatch> {
    let mut competition = env.load(id).await?;
    ensure_can_record_catch(&competition, actor)?;

    if let Some(species) = request.fish_species_id {
        ensure_fish_species_exists(env, species).await?;
    }

    let new = request.into_new_fish_catch(actor.user_id)?;
    let (fish_catch, event) = competition.record_fish_catch(new, &env.context(actor))?;
    env.commit(&mut competition, event).await?;

    Ok(fish_catch)
}

pub async fn remove_fish_catch(
    env: &CommandEnv<'_>,
    actor: &Actor,
    id: CompetitionId,
    fish_catch_id: Uuid,
) -> WebResult<()> {
    let mut competition = env.load(id).await?;
    let fish_catch = competition
        .fish_catch(fish_catch_id)
        .ok_or_else(|| DomainError::not_found("FishCatch", fish_catch_id))?;
    ensure_can_delete_catch(&competition, fish_catch, actor)?;

    let event = competition.remove_fish_catch(fish_catch_id, &env.context(actor))?;
    env.commit(&mut competition, event).await?;

    Ok(())
}
