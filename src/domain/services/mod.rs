pub mod catalog;
pub mod roster;
