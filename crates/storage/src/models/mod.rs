mod category;
mod competition;
mod fish_catch;
mod participant;

pub use category::{CategoryDefinitionRow, CompetitionCategoryRow};
pub use competition::CompetitionRow;
pub use fish_catch::FishCatchRow;
pub use participant::ParticipantRow;
