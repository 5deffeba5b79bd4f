use crate::domain::models::{activity::ActivityRoster, participant::Participant};
use crate::domain::services::catalog::{SeedActivity, SeedOutcome};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage for activities and their participants.
///
/// `enroll` and `withdraw` each run in one transaction that holds a lock on the
/// activity while the participant set is read, checked and changed.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    async fn list_activities(&self) -> Result<Vec<ActivityRoster>, AppError>;
    async fn find_activity(&self, name: &str) -> Result<Option<ActivityRoster>, AppError>;
    async fn enroll(&self, activity_name: &str, email: &str) -> Result<Participant, AppError>;
    async fn withdraw(&self, activity_name: &str, email: &str) -> Result<(), AppError>;
    async fn count_activities(&self) -> Result<i64, AppError>;
    async fn seed_if_empty(&self, catalog: &[SeedActivity]) -> Result<SeedOutcome, AppError>;
    async fn ping(&self) -> Result<(), AppError>;
}
