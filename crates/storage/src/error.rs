use domain::CompetitionId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Competition {competition_id} was modified concurrently (expected version {expected_version})")]
    ConcurrencyConflict {
        competition_id: CompetitionId,
        expected_version: i32,
    },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Stored data is invalid: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(self, StorageError::ConcurrencyConflict { .. })
    }
}

impl From<domain::DomainError> for StorageError {
    fn from(error: domain::DomainError) -> Self {
        Self::InvalidData(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let conflict = StorageError::ConcurrencyConflict {
            competition_id: 4,
            expected_version: 2,
        };
        assert!(conflict.is_concurrency_conflict());
        assert_eq!(
            conflict.to_string(),
            "Competition 4 was modified concurrently (expected version 2)"
        );

        let stored = StorageError::from(domain::DomainError::validation("status", "bad"));
        assert!(matches!(stored, StorageError::InvalidData(ref m) if m == "status: bad"));
        assert!(!stored.is_concurrency_conflict());
        assert!(!StorageError::ConstraintViolation("dup".to_string()).is_concurrency_conflict());
    }
}
