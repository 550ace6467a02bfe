use domain::{CategoryDefinition, CompetitionCategory, ScoringRule, parse_text};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::Result;

#[derive(Debug, Clone, FromRow)]
pub struct CategoryDefinitionRow {
    pub definition_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_global: bool,
    pub category_type: String,
    pub metric: String,
    pub calculation_logic: String,
    pub entity_type: String,
    pub requires_specific_fish_species: bool,
    pub allow_manual_winner_assignment: bool,
}

impl CategoryDefinitionRow {
    pub const COLUMNS: &'static str = "d.definition_id, d.name, d.description, d.is_global, \
        d.category_type, d.metric, d.calculation_logic, d.entity_type, \
        d.requires_specific_fish_species, d.allow_manual_winner_assignment";
}

impl TryFrom<CategoryDefinitionRow> for CategoryDefinition {
    type Error = crate::error::StorageError;

    fn try_from(row: CategoryDefinitionRow) -> Result<Self> {
        Ok(CategoryDefinition::new(
            row.definition_id,
            row.name,
            row.description,
            row.is_global,
            parse_text("category_type", &row.category_type)?,
            ScoringRule {
                metric: parse_text("metric", &row.metric)?,
                calculation_logic: parse_text("calculation_logic", &row.calculation_logic)?,
                entity_type: parse_text("entity_type", &row.entity_type)?,
            },
            row.requires_specific_fish_species,
            row.allow_manual_winner_assignment,
        )?)
    }
}

/// A competition category joined with its definition.
#[derive(Debug, Clone, FromRow)]
pub struct CompetitionCategoryRow {
    pub category_id: Uuid,
    pub is_primary_scoring: bool,
    pub is_enabled: bool,
    pub sort_order: i32,
    pub fish_species_id: Option<i32>,
    pub custom_name_override: Option<String>,
    #[sqlx(flatten)]
    pub definition: CategoryDefinitionRow,
}

impl TryFrom<CompetitionCategoryRow> for CompetitionCategory {
    type Error = crate::error::StorageError;

    fn try_from(row: CompetitionCategoryRow) -> Result<Self> {
        Ok(CompetitionCategory {
            id: row.category_id,
            definition: row.definition.try_into()?,
            is_primary_scoring: row.is_primary_scoring,
            is_enabled: row.is_enabled,
            sort_order: row.sort_order,
            fish_species_id: row.fish_species_id,
            custom_name_override: row.custom_name_override,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{CalculationLogic, CategoryEntityType, CategoryMetric};

    fn definition_row() -> CategoryDefinitionRow {
        CategoryDefinitionRow {
            definition_id: 1,
            name: "Najdłuższa ryba".to_string(),
            description: None,
            is_global: true,
            category_type: "special_achievement".to_string(),
            metric: "length_cm".to_string(),
            calculation_logic: "max_value".to_string(),
            entity_type: "fish_catch".to_string(),
            requires_specific_fish_species: false,
            allow_manual_winner_assignment: true,
        }
    }

    #[test]
    fn test_definition_row_conversion() {
        let definition = CategoryDefinition::try_from(definition_row()).unwrap();
        assert_eq!(definition.metric(), CategoryMetric::LengthCm);
        assert_eq!(definition.calculation_logic(), CalculationLogic::MaxValue);
        assert_eq!(definition.entity_type(), CategoryEntityType::FishCatch);
        assert!(definition.allow_manual_winner_assignment());
    }

    #[test]
    fn test_unknown_metric_is_rejected() {
        let mut row = definition_row();
        row.metric = "volume_l".to_string();
        assert!(CategoryDefinition::try_from(row).is_err());
    }

    #[test]
    fn test_competition_category_row_conversion() {
        let row = CompetitionCategoryRow {
            category_id: Uuid::from_u128(9),
            is_primary_scoring: false,
            is_enabled: true,
            sort_order: 2,
            fish_species_id: Some(4),
            custom_name_override: Some("Największy okoń".to_string()),
            definition: definition_row(),
        };
        let category = CompetitionCategory::try_from(row).unwrap();
        assert_eq!(category.display_name(), "Największy okoń");
        assert_eq!(category.sort_order, 2);
    }
}
