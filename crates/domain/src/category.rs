use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult, optional_text};

pub type CategoryDefinitionId = i32;
pub type FishSpeciesId = i32;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum CategoryType {
    MainScoring,
    SpecialAchievement,
}


#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum CategoryMetric {
    LengthCm,
    WeightKg,
    FishCount,
    SpeciesVariety,
    NotApplicable,
}


#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum CalculationLogic {
    SumValue,
    MaxValue,
}


#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum CategoryEntityType {
    ParticipantAggregateCatches,
    FishCatch,
}


/// How a category turns catches into a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScoringRule {
    pub metric: CategoryMetric,
    pub calculation_logic: CalculationLogic,
    pub entity_type: CategoryEntityType,
}

/// Catalog entry describing a scoring rule template.
///
/// The scoring rule is fixed at construction: competitions that already
/// reference a definition rely on its aggregation never changing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryDefinition {
    id: CategoryDefinitionId,
    name: String,
    description: Option<String>,
    is_global: bool,
    category_type: CategoryType,
    scoring: ScoringRule,
    requires_specific_fish_species: bool,
    allow_manual_winner_assignment: bool,
}

impl CategoryDefinition {
    pub const MAX_NAME_LEN: usize = 100;

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CategoryDefinitionId,
        name: impl Into<String>,
        description: Option<String>,
        is_global: bool,
        category_type: CategoryType,
        scoring: ScoringRule,
        requires_specific_fish_species: bool,
        allow_manual_winner_assignment: bool,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() || name.chars().count() > Self::MAX_NAME_LEN {
            return Err(DomainError::validation(
                "name",
                format!(
                    "Name must be between 1 and {} characters",
                    Self::MAX_NAME_LEN
                ),
            ));
        }
        if category_type == CategoryType::MainScoring
            && scoring.metric == CategoryMetric::NotApplicable
        {
            return Err(DomainError::validation(
                "metric",
                "Main scoring categories need a measurable metric",
            ));
        }

        Ok(Self {
            id,
            name,
            description,
            is_global,
            category_type,
            scoring,
            requires_specific_fish_species,
            allow_manual_winner_assignment,
        })
    }

    pub fn id(&self) -> CategoryDefinitionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_global(&self) -> bool {
        self.is_global
    }

    pub fn category_type(&self) -> CategoryType {
        self.category_type
    }

    pub fn scoring(&self) -> ScoringRule {
        self.scoring
    }

    pub fn metric(&self) -> CategoryMetric {
        self.scoring.metric
    }

    pub fn calculation_logic(&self) -> CalculationLogic {
        self.scoring.calculation_logic
    }

    pub fn entity_type(&self) -> CategoryEntityType {
        self.scoring.entity_type
    }

    pub fn requires_specific_fish_species(&self) -> bool {
        self.requires_specific_fish_species
    }

    pub fn allow_manual_winner_assignment(&self) -> bool {
        self.allow_manual_winner_assignment
    }
}

/// Input for configuring a category on a competition.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub definition: CategoryDefinition,
    pub is_primary_scoring: bool,
    pub fish_species_id: Option<FishSpeciesId>,
    pub custom_name_override: Option<String>,
    pub sort_order: i32,
}

impl NewCategory {
    pub fn primary(definition: CategoryDefinition) -> Self {
        Self {
            definition,
            is_primary_scoring: true,
            fish_species_id: None,
            custom_name_override: None,
            sort_order: 0,
        }
    }

    pub fn special(definition: CategoryDefinition, sort_order: i32) -> Self {
        Self {
            definition,
            is_primary_scoring: false,
            fish_species_id: None,
            custom_name_override: None,
            sort_order,
        }
    }

    pub fn with_fish_species(mut self, fish_species_id: FishSpeciesId) -> Self {
        self.fish_species_id = Some(fish_species_id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name_override = Some(name.into());
        self
    }
}

/// A category definition configured on one competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionCategory {
    pub id: Uuid,
    pub definition: CategoryDefinition,
    pub is_primary_scoring: bool,
    pub is_enabled: bool,
    pub sort_order: i32,
    pub fish_species_id: Option<FishSpeciesId>,
    pub custom_name_override: Option<String>,
}

impl CompetitionCategory {
    pub const MAX_CUSTOM_NAME_LEN: usize = 100;

    /// Validates everything that can be checked without the owning
    /// competition.
    pub(crate) fn configure(new: NewCategory) -> DomainResult<Self> {
        if new.definition.requires_specific_fish_species() && new.fish_species_id.is_none() {
            return Err(DomainError::validation(
                "fish_species_id",
                format!(
                    "Category '{}' requires a specific fish species",
                    new.definition.name()
                ),
            ));
        }

        let sort_order = if new.is_primary_scoring {
            if new.definition.category_type() != CategoryType::MainScoring {
                return Err(DomainError::validation(
                    "is_primary_scoring",
                    "Only main scoring definitions can be the primary category",
                ));
            }
            0
        } else {
            if new.sort_order < 1 {
                return Err(DomainError::validation(
                    "sort_order",
                    "Special categories are ordered starting at 1",
                ));
            }
            new.sort_order
        };

        let custom_name_override = optional_text(
            "custom_name_override",
            new.custom_name_override.as_deref(),
            Self::MAX_CUSTOM_NAME_LEN,
        )?;

        Ok(Self {
            id: Uuid::new_v4(),
            definition: new.definition,
            is_primary_scoring: new.is_primary_scoring,
            is_enabled: true,
            sort_order,
            fish_species_id: new.fish_species_id,
            custom_name_override,
        })
    }

    pub fn display_name(&self) -> &str {
        self.custom_name_override
            .as_deref()
            .unwrap_or_else(|| self.definition.name())
    }

    pub fn is_enabled_primary(&self) -> bool {
        self.is_enabled && self.is_primary_scoring
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn longest_fish() -> CategoryDefinition {
        CategoryDefinition::new(
            1,
            "Total length",
            Some("Sum of all measured lengths".to_string()),
            true,
            CategoryType::MainScoring,
            ScoringRule {
                metric: CategoryMetric::LengthCm,
                calculation_logic: CalculationLogic::SumValue,
                entity_type: CategoryEntityType::ParticipantAggregateCatches,
            },
            false,
            false,
        )
        .unwrap()
    }

    pub fn biggest_pike() -> CategoryDefinition {
        CategoryDefinition::new(
            2,
            "Biggest fish of species",
            None,
            true,
            CategoryType::SpecialAchievement,
            ScoringRule {
                metric: CategoryMetric::LengthCm,
                calculation_logic: CalculationLogic::MaxValue,
                entity_type: CategoryEntityType::FishCatch,
            },
            true,
            false,
        )
        .unwrap()
    }

    pub fn heaviest_fish() -> CategoryDefinition {
        CategoryDefinition::new(
            3,
            "Heaviest fish",
            None,
            true,
            CategoryType::SpecialAchievement,
            ScoringRule {
                metric: CategoryMetric::WeightKg,
                calculation_logic: CalculationLogic::MaxValue,
                entity_type: CategoryEntityType::FishCatch,
            },
            false,
            true,
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_main_scoring_needs_metric() {
        let result = CategoryDefinition::new(
            9,
            "Judges' choice",
            None,
            false,
            CategoryType::MainScoring,
            ScoringRule {
                metric: CategoryMetric::NotApplicable,
                calculation_logic: CalculationLogic::MaxValue,
                entity_type: CategoryEntityType::FishCatch,
            },
            false,
            true,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_definition_name_is_required() {
        let mut scoring = longest_fish().scoring();
        scoring.calculation_logic = CalculationLogic::MaxValue;
        let result = CategoryDefinition::new(
            9,
            "   ",
            None,
            false,
            CategoryType::SpecialAchievement,
            scoring,
            false,
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_configure_requires_species_when_definition_does() {
        let err = CompetitionCategory::configure(NewCategory::special(biggest_pike(), 1))
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation {
                field: "fish_species_id",
                ..
            }
        ));

        let category =
            CompetitionCategory::configure(NewCategory::special(biggest_pike(), 1).with_fish_species(4))
                .unwrap();
        assert_eq!(category.fish_species_id, Some(4));
    }

    #[test]
    fn test_configure_primary_is_sorted_first() {
        let mut new = NewCategory::primary(longest_fish());
        new.sort_order = 7;
        let category = CompetitionCategory::configure(new).unwrap();
        assert_eq!(category.sort_order, 0);
        assert!(category.is_enabled_primary());
    }

    #[test]
    fn test_configure_rejects_special_definition_as_primary() {
        let result = CompetitionCategory::configure(NewCategory::primary(heaviest_fish()));
        assert!(result.is_err());
    }

    #[test]
    fn test_configure_special_sort_order_starts_at_one() {
        assert!(CompetitionCategory::configure(NewCategory::special(heaviest_fish(), 0)).is_err());
        assert!(CompetitionCategory::configure(NewCategory::special(heaviest_fish(), 1)).is_ok());
    }

    #[test]
    fn test_display_name_prefers_override() {
        let category = CompetitionCategory::configure(
            NewCategory::special(heaviest_fish(), 1).with_name("Heaviest carp"),
        )
        .unwrap();
        assert_eq!(category.display_name(), "Heaviest carp");

        let category = CompetitionCategory::configure(NewCategory::special(heaviest_fish(), 2))
            .unwrap();
        assert_eq!(category.display_name(), "Heaviest fish");
    }

    #[test]
    fn test_enum_text_round_trip() {
        assert_eq!(
            CategoryMetric::from_str("species_variety").unwrap(),
            CategoryMetric::SpeciesVariety
        );
        assert_eq!(
            CategoryEntityType::from_str(&CategoryEntityType::FishCatch.to_string()).unwrap(),
            CategoryEntityType::FishCatch
        );
        assert!(CalculationLogic::from_str("avg_value").is_err());
    }
}
