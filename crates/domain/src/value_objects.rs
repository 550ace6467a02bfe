use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{DomainError, DomainResult};

/// A closed time window with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "RawRange")]
pub struct DateTimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawRange> for DateTimeRange {
    type Error = DomainError;

    fn try_from(raw: RawRange) -> DomainResult<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl DateTimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        if end <= start {
            return Err(DomainError::validation(
                "schedule",
                "End time must be after start time",
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Same check as [`contains`](Self::contains) with the window widened by
    /// `tolerance` on both sides.
    pub fn contains_with_tolerance(&self, instant: DateTime<Utc>, tolerance: Duration) -> bool {
        self.start - tolerance <= instant && instant <= self.end + tolerance
    }
}

/// Fish length in centimetres, `0 < value <= 500`, at most two decimal
/// places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct FishLength(Decimal);

impl FishLength {
    pub const MAX_CM: Decimal = Decimal::from_parts(500, 0, 0, false, 0);
    pub const SCALE: u32 = 2;

    pub fn new(centimetres: Decimal) -> DomainResult<Self> {
        if centimetres.normalize().scale() > Self::SCALE {
            return Err(DomainError::validation(
                "length",
                format!("Length allows at most {} decimal places", Self::SCALE),
            ));
        }
        if centimetres <= Decimal::ZERO {
            return Err(DomainError::validation(
                "length",
                "Length must be greater than 0 cm",
            ));
        }
        if centimetres > Self::MAX_CM {
            return Err(DomainError::validation(
                "length",
                format!("Length must be at most {} cm", Self::MAX_CM),
            ));
        }
        Ok(Self(centimetres))
    }

    pub fn centimetres(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for FishLength {
    type Error = DomainError;

    fn try_from(value: Decimal) -> DomainResult<Self> {
        Self::new(value)
    }
}

impl From<FishLength> for Decimal {
    fn from(length: FishLength) -> Self {
        length.0
    }
}

/// Fish weight in kilograms, `0 < value <= 200`, at most three decimal
/// places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct FishWeight(Decimal);

impl FishWeight {
    pub const MAX_KG: Decimal = Decimal::from_parts(200, 0, 0, false, 0);
    pub const SCALE: u32 = 3;

    pub fn new(kilograms: Decimal) -> DomainResult<Self> {
        if kilograms.normalize().scale() > Self::SCALE {
            return Err(DomainError::validation(
                "weight",
                format!("Weight allows at most {} decimal places", Self::SCALE),
            ));
        }
        if kilograms <= Decimal::ZERO {
            return Err(DomainError::validation(
                "weight",
                "Weight must be greater than 0 kg",
            ));
        }
        if kilograms > Self::MAX_KG {
            return Err(DomainError::validation(
                "weight",
                format!("Weight must be at most {} kg", Self::MAX_KG),
            ));
        }
        Ok(Self(kilograms))
    }

    pub fn kilograms(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for FishWeight {
    type Error = DomainError;

    fn try_from(value: Decimal) -> DomainResult<Self> {
        Self::new(value)
    }
}

impl From<FishWeight> for Decimal {
    fn from(weight: FishWeight) -> Self {
        weight.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_range_requires_start_before_end() {
        assert!(DateTimeRange::new(at(6), at(14)).is_ok());
        assert!(DateTimeRange::new(at(6), at(6)).is_err());
        assert!(DateTimeRange::new(at(14), at(6)).is_err());
    }

    #[test]
    fn test_range_contains() {
        let range = DateTimeRange::new(at(6), at(14)).unwrap();
        assert!(range.contains(at(6)));
        assert!(range.contains(at(14)));
        assert!(!range.contains(at(15)));
        assert!(range.contains_with_tolerance(at(15), Duration::hours(1)));
        assert!(!range.contains_with_tolerance(at(16), Duration::hours(1)));
        assert_eq!(range.duration(), Duration::hours(8));
    }

    #[test]
    fn test_range_deserialization_is_validated() {
        let ok = r#"{"start":"2025-06-01T06:00:00Z","end":"2025-06-01T14:00:00Z"}"#;
        assert!(serde_json::from_str::<DateTimeRange>(ok).is_ok());

        let reversed = r#"{"start":"2025-06-01T14:00:00Z","end":"2025-06-01T06:00:00Z"}"#;
        assert!(serde_json::from_str::<DateTimeRange>(reversed).is_err());
    }

    #[test]
    fn test_length_bounds() {
        assert!(FishLength::new(Decimal::ZERO).is_err());
        assert!(FishLength::new(Decimal::new(-1, 0)).is_err());
        assert!(FishLength::new(Decimal::new(50001, 2)).is_err());
        assert!(FishLength::new(Decimal::new(500, 0)).is_ok());
        assert_eq!(
            FishLength::new(Decimal::new(455, 1)).unwrap().centimetres(),
            Decimal::new(455, 1)
        );
    }

    #[test]
    fn test_weight_bounds() {
        assert!(FishWeight::new(Decimal::ZERO).is_err());
        assert!(FishWeight::new(Decimal::new(20001, 2)).is_err());
        assert!(FishWeight::new(Decimal::new(200, 0)).is_ok());
        assert!(FishWeight::new(Decimal::new(1, 3)).is_ok());
    }

    #[test]
    fn test_measurement_precision() {
        assert!(FishLength::new(Decimal::new(1, 3)).is_err());
        assert!(FishLength::new(Decimal::new(45555, 3)).is_err());
        assert!(FishLength::new(Decimal::new(1, 2)).is_ok());
        assert_eq!(
            FishLength::new(Decimal::new(45500, 3)).unwrap().centimetres(),
            Decimal::new(455, 1)
        );

        assert!(FishWeight::new(Decimal::new(1, 4)).is_err());
        assert!(FishWeight::new(Decimal::new(12345, 4)).is_err());
        assert!(FishWeight::new(Decimal::new(12340, 4)).is_ok());
    }
}
