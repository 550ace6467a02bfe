use chrono::{DateTime, Utc};
use domain::{
    CategoryDefinitionId, Competition, CompetitionCategory, CompetitionDetails, CompetitionType,
    DateTimeRange, DomainResult, FishSpeciesId, StatusOperation, parse_text,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::fish_catch::FishCatchResponse;
use super::participant::ParticipantResponse;

/// Request payload for creating a new competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCompetitionRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    pub start_time: DateTime<Utc>,

    pub end_time: DateTime<Utc>,

    #[validate(custom(function = "validate_competition_type"))]
    #[serde(default = "default_competition_type")]
    pub competition_type: String,

    pub fishery_id: i32,

    #[validate(length(max = 5000))]
    pub rules: Option<String>,

    #[validate(length(max = 2048))]
    pub image_url: Option<String>,

    #[validate(length(max = 2048))]
    pub image_public_id: Option<String>,

    #[validate(nested)]
    pub primary_category: CategoryRequest,

    #[validate(nested)]
    #[serde(default)]
    pub special_categories: Vec<CategoryRequest>,
}

/// A category definition to attach while creating a competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    pub definition_id: CategoryDefinitionId,

    pub fish_species_id: Option<FishSpeciesId>,

    #[validate(length(min = 1, max = 100))]
    pub custom_name_override: Option<String>,

    /// Ignored for the primary category. Special categories default to the
    /// position after the last one.
    #[validate(range(min = 1))]
    pub sort_order: Option<i32>,
}

/// Request payload for adding a category to an existing competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddCategoryRequest {
    #[serde(default)]
    pub is_primary_scoring: bool,

    #[validate(nested)]
    #[serde(flatten)]
    pub category: CategoryRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetCategoryEnabledRequest {
    pub is_enabled: bool,
}

/// Request payload for updating an existing competition.
/// Omitted fields keep their current value; an empty `rules`, `image_url` or
/// `image_public_id` clears it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCompetitionRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    pub start_time: Option<DateTime<Utc>>,

    pub end_time: Option<DateTime<Utc>>,

    #[validate(custom(function = "validate_competition_type"))]
    pub competition_type: Option<String>,

    pub fishery_id: Option<i32>,

    #[validate(length(max = 5000))]
    pub rules: Option<String>,

    #[validate(length(max = 2048))]
    pub image_url: Option<String>,

    #[validate(length(max = 2048))]
    pub image_public_id: Option<String>,
}

/// Request payload for moving a competition through its lifecycle.
///
/// `reason` is required for `reject_approval` and `cancel_competition`,
/// optional for `set_to_draft` and ignored otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct StatusChangeRequest {
    #[validate(custom(function = "validate_status_operation"))]
    pub operation: String,

    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Response containing the full competition aggregate
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompetitionResponse {
    pub competition_id: i32,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub competition_type: String,
    pub organizer_id: Uuid,
    pub fishery_id: i32,
    pub rules: Option<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub status: String,
    pub status_reason: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub categories: Vec<CategoryResponse>,
    pub participants: Vec<ParticipantResponse>,
    pub fish_catches: Vec<FishCatchResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub category_id: Uuid,
    pub definition_id: CategoryDefinitionId,
    pub name: String,
    pub category_type: String,
    pub metric: String,
    pub calculation_logic: String,
    pub entity_type: String,
    pub is_primary_scoring: bool,
    pub is_enabled: bool,
    pub sort_order: i32,
    pub fish_species_id: Option<FishSpeciesId>,
    pub custom_name_override: Option<String>,
    pub allow_manual_winner_assignment: bool,
}

// Validation helpers
fn default_competition_type() -> String {
    CompetitionType::Public.to_string()
}

fn validate_competition_type(value: &str) -> Result<(), validator::ValidationError> {
    value
        .parse::<CompetitionType>()
        .map(|_| ())
        .map_err(|_| validator::ValidationError::new("invalid_competition_type"))
}

fn validate_status_operation(value: &str) -> Result<(), validator::ValidationError> {
    value
        .parse::<StatusOperation>()
        .map(|_| ())
        .map_err(|_| validator::ValidationError::new("invalid_operation"))
}

impl StatusChangeRequest {
    pub fn operation(&self) -> DomainResult<StatusOperation> {
        parse_text("operation", &self.operation)
    }
}

impl CreateCompetitionRequest {
    /// Additional validation that requires multiple fields
    pub fn validate_schedule(&self) -> Result<(), &'static str> {
        if self.end_time <= self.start_time {
            return Err("End time must be after start time");
        }
        Ok(())
    }

    /// Builds the descriptive part of the aggregate. Category definitions are
    /// resolved separately by the caller.
    pub fn details(&self) -> DomainResult<CompetitionDetails> {
        Ok(CompetitionDetails {
            name: self.name.clone(),
            schedule: DateTimeRange::new(self.start_time, self.end_time)?,
            competition_type: parse_text("competition_type", &self.competition_type)?,
            fishery_id: self.fishery_id,
            rules: self.rules.clone(),
            image_url: self.image_url.clone(),
            image_public_id: self.image_public_id.clone(),
        })
    }
}

impl UpdateCompetitionRequest {
    /// Merges the request over the current details.
    pub fn apply_to(&self, current: &CompetitionDetails) -> DomainResult<CompetitionDetails> {
        let start = self.start_time.unwrap_or(current.schedule.start());
        let end = self.end_time.unwrap_or(current.schedule.end());
        let competition_type = match &self.competition_type {
            Some(value) => parse_text("competition_type", value)?,
            None => current.competition_type,
        };

        Ok(CompetitionDetails {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            schedule: DateTimeRange::new(start, end)?,
            competition_type,
            fishery_id: self.fishery_id.unwrap_or(current.fishery_id),
            rules: self.rules.clone().or_else(|| current.rules.clone()),
            image_url: self.image_url.clone().or_else(|| current.image_url.clone()),
            image_public_id: self
                .image_public_id
                .clone()
                .or_else(|| current.image_public_id.clone()),
        })
    }
}

impl From<&CompetitionCategory> for CategoryResponse {
    fn from(category: &CompetitionCategory) -> Self {
        Self {
            category_id: category.id,
            definition_id: category.definition.id(),
            name: category.display_name().to_string(),
            category_type: category.definition.category_type().to_string(),
            metric: category.definition.metric().to_string(),
            calculation_logic: category.definition.calculation_logic().to_string(),
            entity_type: category.definition.entity_type().to_string(),
            is_primary_scoring: category.is_primary_scoring,
            is_enabled: category.is_enabled,
            sort_order: category.sort_order,
            fish_species_id: category.fish_species_id,
            custom_name_override: category.custom_name_override.clone(),
            allow_manual_winner_assignment: category.definition.allow_manual_winner_assignment(),
        }
    }
}

impl From<&Competition> for CompetitionResponse {
    fn from(competition: &Competition) -> Self {
        let details = competition.details();
        Self {
            competition_id: competition.id(),
            name: details.name.clone(),
            start_time: details.schedule.start(),
            end_time: details.schedule.end(),
            competition_type: details.competition_type.to_string(),
            organizer_id: competition.organizer_id(),
            fishery_id: details.fishery_id,
            rules: details.rules.clone(),
            image_url: details.image_url.clone(),
            image_public_id: details.image_public_id.clone(),
            status: competition.status().to_string(),
            status_reason: competition.status_reason().map(str::to_string),
            version: competition.version(),
            created_at: competition.audit().created_at,
            last_modified_at: competition.audit().last_modified_at,
            categories: competition
                .ordered_categories()
                .into_iter()
                .map(CategoryResponse::from)
                .collect(),
            participants: competition
                .participants()
                .iter()
                .map(ParticipantResponse::from)
                .collect(),
            fish_catches: competition
                .fish_catches()
                .iter()
                .map(FishCatchResponse::from)
                .collect(),
        }
    }
}
