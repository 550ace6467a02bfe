use chrono::{DateTime, Utc};
use domain::{Participant, ParticipantRole};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request payload for adding a guest competitor without an account
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddGuestRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Guest name must be between 1 and 100 characters"
    ))]
    pub name: String,
}

/// Request payload for appointing a judge or co-organizer
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddOfficialRequest {
    pub user_id: Uuid,

    #[validate(custom(function = "validate_official_role"))]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RejectParticipantRequest {
    #[validate(length(
        min = 1,
        max = 500,
        message = "Reason must be between 1 and 500 characters"
    ))]
    pub reason: String,
}

/// Sector and stand; omitted values clear the placement
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct AssignPlacementRequest {
    #[validate(length(max = 50))]
    pub sector: Option<String>,

    #[validate(length(max = 50))]
    pub stand: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParticipantResponse {
    pub participant_id: Uuid,
    pub user_id: Option<Uuid>,
    pub guest_name: Option<String>,
    pub role: String,
    pub status: String,
    pub sector: Option<String>,
    pub stand: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn validate_official_role(role: &str) -> Result<(), validator::ValidationError> {
    match role.parse::<ParticipantRole>() {
        Ok(role) if role.is_official() => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_official_role")),
    }
}

impl AddOfficialRequest {
    pub fn role(&self) -> domain::DomainResult<ParticipantRole> {
        domain::parse_text("role", &self.role)
    }
}

impl From<&Participant> for ParticipantResponse {
    fn from(participant: &Participant) -> Self {
        Self {
            participant_id: participant.id,
            user_id: participant.user_id,
            guest_name: participant.guest_name.clone(),
            role: participant.role.to_string(),
            status: participant.status.to_string(),
            sector: participant.sector.clone(),
            stand: participant.stand.clone(),
            rejection_reason: participant.rejection_reason.clone(),
            created_at: participant.audit.created_at,
        }
    }
}
