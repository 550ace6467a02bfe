use chrono::{DateTime, Utc};
use domain::{
    Audit, CompetitionCategory, CompetitionDetails, CompetitionState, DateTimeRange, FishCatch,
    Participant, parse_text,
};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::Result;

#[derive(Debug, Clone, FromRow)]
pub struct CompetitionRow {
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
    pub created_by: Uuid,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub last_modified_by: Option<Uuid>,
}

impl CompetitionRow {
    pub const COLUMNS: &'static str = "competition_id, name, start_time, end_time, \
        competition_type, organizer_id, fishery_id, rules, image_url, image_public_id, \
        status, status_reason, version, created_at, created_by, last_modified_at, \
        last_modified_by";

    /// Combines the row with its already-loaded children into the state the
    /// aggregate is rebuilt from.
    pub fn into_state(
        self,
        participants: Vec<Participant>,
        categories: Vec<CompetitionCategory>,
        fish_catches: Vec<FishCatch>,
    ) -> Result<CompetitionState> {
        Ok(CompetitionState {
            id: self.competition_id,
            organizer_id: self.organizer_id,
            details: CompetitionDetails {
                name: self.name,
                schedule: DateTimeRange::new(self.start_time, self.end_time)?,
                competition_type: parse_text("competition_type", &self.competition_type)?,
                fishery_id: self.fishery_id,
                rules: self.rules,
                image_url: self.image_url,
                image_public_id: self.image_public_id,
            },
            status: parse_text("status", &self.status)?,
            status_reason: self.status_reason,
            version: self.version,
            audit: Audit {
                created_at: self.created_at,
                created_by: self.created_by,
                last_modified_at: self.last_modified_at,
                last_modified_by: self.last_modified_by,
            },
            participants,
            categories,
            fish_catches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domain::{CompetitionStatus, CompetitionType};

    fn row() -> CompetitionRow {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 6, 0, 0).unwrap();
        CompetitionRow {
            competition_id: 3,
            name: "Puchar Wisły".to_string(),
            start_time: start,
            end_time: start + chrono::Duration::hours(6),
            competition_type: "private".to_string(),
            organizer_id: Uuid::from_u128(1),
            fishery_id: 2,
            rules: None,
            image_url: None,
            image_public_id: None,
            status: "upcoming".to_string(),
            status_reason: None,
            version: 4,
            created_at: start,
            created_by: Uuid::from_u128(1),
            last_modified_at: None,
            last_modified_by: None,
        }
    }

    #[test]
    fn test_row_into_state() {
        let state = row().into_state(Vec::new(), Vec::new(), Vec::new()).unwrap();
        assert_eq!(state.id, 3);
        assert_eq!(state.version, 4);
        assert_eq!(state.status, CompetitionStatus::Upcoming);
        assert_eq!(state.details.competition_type, CompetitionType::Private);
    }

    #[test]
    fn test_invalid_status_is_reported() {
        let mut row = row();
        row.status = "live".to_string();
        assert!(row.into_state(Vec::new(), Vec::new(), Vec::new()).is_err());
    }
}
