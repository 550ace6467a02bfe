use chrono::{DateTime, Utc};
use domain::{Audit, Participant, parse_text};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{Result, StorageError};

#[derive(Debug, Clone, FromRow)]
pub struct ParticipantRow {
    pub participant_id: Uuid,
    pub user_id: Option<Uuid>,
    pub guest_name: Option<String>,
    pub role: String,
    pub status: String,
    pub sector: Option<String>,
    pub stand: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub last_modified_by: Option<Uuid>,
}

impl ParticipantRow {
    pub const COLUMNS: &'static str = "participant_id, user_id, guest_name, role, status, \
        sector, stand, rejection_reason, created_at, created_by, last_modified_at, \
        last_modified_by";
}

impl TryFrom<ParticipantRow> for Participant {
    type Error = StorageError;

    fn try_from(row: ParticipantRow) -> Result<Self> {
        if row.user_id.is_none() && row.guest_name.is_none() {
            return Err(StorageError::InvalidData(format!(
                "Participant {} has neither a user nor a guest name",
                row.participant_id
            )));
        }

        Ok(Participant {
            id: row.participant_id,
            user_id: row.user_id,
            guest_name: row.guest_name,
            role: parse_text("role", &row.role)?,
            status: parse_text("status", &row.status)?,
            sector: row.sector,
            stand: row.stand,
            rejection_reason: row.rejection_reason,
            audit: Audit {
                created_at: row.created_at,
                created_by: row.created_by,
                last_modified_at: row.last_modified_at,
                last_modified_by: row.last_modified_by,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{ParticipantRole, ParticipantStatus};

    fn row() -> ParticipantRow {
        ParticipantRow {
            participant_id: Uuid::from_u128(10),
            user_id: None,
            guest_name: Some("Gość".to_string()),
            role: "competitor".to_string(),
            status: "approved".to_string(),
            sector: Some("A".to_string()),
            stand: None,
            rejection_reason: None,
            created_at: Utc::now(),
            created_by: Uuid::from_u128(1),
            last_modified_at: None,
            last_modified_by: None,
        }
    }

    #[test]
    fn test_guest_row_conversion() {
        let participant = Participant::try_from(row()).unwrap();
        assert!(participant.is_guest());
        assert_eq!(participant.role, ParticipantRole::Competitor);
        assert_eq!(participant.status, ParticipantStatus::Approved);
    }

    #[test]
    fn test_row_without_identity_is_invalid() {
        let mut row = row();
        row.guest_name = None;
        assert!(matches!(
            Participant::try_from(row),
            Err(StorageError::InvalidData(_))
        ));
    }
}
