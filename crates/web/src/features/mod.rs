pub mod catches;
pub mod competitions;
pub mod participants;
