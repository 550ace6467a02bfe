pub mod competition;
pub mod fish_catch;
pub mod participant;
