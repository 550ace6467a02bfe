use std::str::FromStr;

use thiserror::Error;

use crate::participant::ParticipantStatus;
use crate::status::CompetitionStatus;

/// Coarse classification of domain failures, used by callers to pick a
/// transport-level response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidStateTransition,
    DomainValidation,
    NotFound,
    Forbidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Cannot change competition status from {from} to {to}")]
    InvalidStatusTransition {
        from: CompetitionStatus,
        to: CompetitionStatus,
    },

    #[error("Cannot change participant status from {from} to {to}")]
    InvalidParticipantTransition {
        from: ParticipantStatus,
        to: ParticipantStatus,
    },

    #[error("Operation '{operation}' is not allowed while the competition is {status}")]
    InvalidOperation {
        operation: &'static str,
        status: CompetitionStatus,
    },

    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidStatusTransition { .. }
            | Self::InvalidParticipantTransition { .. }
            | Self::InvalidOperation { .. } => ErrorKind::InvalidStateTransition,
            Self::Validation { .. } => ErrorKind::DomainValidation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
        }
    }
}

/// Parses an enum stored or sent as text, naming the field on failure.
pub fn parse_text<T>(field: &'static str, value: &str) -> DomainResult<T>
where
    T: FromStr<Err = strum::ParseError>,
{
    value
        .parse()
        .map_err(|_| DomainError::validation(field, format!("Unknown value: '{}'", value)))
}

/// Checks a free-text reason attached to a status change.
pub(crate) fn validate_reason(
    field: &'static str,
    reason: &str,
    max_len: usize,
) -> DomainResult<String> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "Reason is required"));
    }
    if trimmed.chars().count() > max_len {
        return Err(DomainError::validation(
            field,
            format!("Reason must be at most {max_len} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Normalizes an optional text field: blank becomes `None`, overlong fails.
pub(crate) fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max_len: usize,
) -> DomainResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text.chars().count() > max_len => Err(DomainError::validation(
            field,
            format!("Must be at most {max_len} characters"),
        )),
        Some(text) => Ok(Some(text.to_string())),
    }
}
