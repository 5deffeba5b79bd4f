pub mod activity;
pub mod participant;
