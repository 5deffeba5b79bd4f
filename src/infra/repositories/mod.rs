pub mod sqlite_roster_repo;
pub mod postgres_roster_repo;
