use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::models::activity::ActivityRoster;
use crate::domain::ports::RosterRepository;
use crate::domain::services::catalog::{SeedOutcome, DEFAULT_CATALOG};
use crate::error::{AppError, ACTIVITY_FULL, ALREADY_SIGNED_UP, NOT_SIGNED_UP};

/// Decides whether `email` may join the activity. Checks run in order:
/// duplicate membership, then capacity.
pub fn admit(roster: &ActivityRoster, email: &str) -> Result<(), AppError> {
    if roster.is_enrolled(email) {
        return Err(AppError::Conflict(ALREADY_SIGNED_UP.to_string()));
    }
    if roster.is_full() {
        return Err(AppError::Conflict(ACTIVITY_FULL.to_string()));
    }
    Ok(())
}

/// Decides whether `email` may leave the activity.
pub fn release(roster: &ActivityRoster, email: &str) -> Result<(), AppError> {
    if !roster.is_enrolled(email) {
        return Err(AppError::Conflict(NOT_SIGNED_UP.to_string()));
    }
    Ok(())
}

pub struct RosterService {
    repo: Arc<dyn RosterRepository>,
}

impl RosterService {
    pub fn new(repo: Arc<dyn RosterRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_activities(&self) -> Result<Vec<ActivityRoster>, AppError> {
        self.repo.list_activities().await
    }

    pub async fn enroll(&self, activity_name: &str, email: &str) -> Result<String, AppError> {
        match self.repo.enroll(activity_name, email).await {
            Ok(participant) => {
                info!(participant_id = participant.id, "Signed up {} for {}", email, activity_name);
                Ok(format!("Signed up {} for {}", email, activity_name))
            }
            Err(e) if e.is_unique_violation() => {
                warn!("Signup rejected for {} in {}: concurrent duplicate", email, activity_name);
                Err(AppError::Conflict(ALREADY_SIGNED_UP.to_string()))
            }
            Err(e) => {
                log_rejection("Signup", activity_name, email, &e);
                Err(e)
            }
        }
    }

    pub async fn withdraw(&self, activity_name: &str, email: &str) -> Result<String, AppError> {
        match self.repo.withdraw(activity_name, email).await {
            Ok(()) => {
                info!("Unregistered {} from {}", email, activity_name);
                Ok(format!("Unregistered {} from {}", email, activity_name))
            }
            Err(e) => {
                log_rejection("Unregister", activity_name, email, &e);
                Err(e)
            }
        }
    }

    pub async fn seed_default_catalog(&self) -> Result<SeedOutcome, AppError> {
        let outcome = self.repo.seed_if_empty(DEFAULT_CATALOG).await?;
        match outcome {
            SeedOutcome::Seeded { activities, participants } => {
                info!("Seeded {} activities with {} participants", activities, participants);
            }
            SeedOutcome::AlreadySeeded => {
                info!("Store already holds activities, skipping seed");
            }
        }
        Ok(outcome)
    }
}

fn log_rejection(action: &str, activity_name: &str, email: &str, error: &AppError) {
    match error {
        AppError::NotFound(msg) | AppError::Conflict(msg) => {
            warn!("{} rejected for {} in {}: {}", action, email, activity_name, msg);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::activity::Activity;

    fn roster(max: Option<i64>, participants: &[&str]) -> ActivityRoster {
        ActivityRoster::new(
            Activity {
                name: "Math Club".to_string(),
                description: "Solve challenging problems".to_string(),
                schedule: "Tuesdays, 3:30 PM - 4:30 PM".to_string(),
                max_participants: max,
            },
            participants.iter().map(|p| p.to_string()).collect(),
        )
    }

    fn conflict_message(result: Result<(), AppError>) -> String {
        match result {
            Err(AppError::Conflict(msg)) => msg,
            other => panic!("Expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_admit_new_email_with_room() {
        let r = roster(Some(10), &["james@mergington.edu", "benjamin@mergington.edu"]);
        assert!(admit(&r, "new@mergington.edu").is_ok());
    }

    #[test]
    fn test_admit_rejects_duplicate() {
        let r = roster(Some(10), &["james@mergington.edu"]);
        assert_eq!(conflict_message(admit(&r, "james@mergington.edu")), ALREADY_SIGNED_UP);
    }

    #[test]
    fn test_admit_rejects_when_full() {
        let r = roster(Some(1), &["james@mergington.edu"]);
        assert_eq!(conflict_message(admit(&r, "new@mergington.edu")), ACTIVITY_FULL);
    }

    #[test]
    fn test_duplicate_is_reported_before_full() {
        let r = roster(Some(1), &["james@mergington.edu"]);
        assert_eq!(conflict_message(admit(&r, "james@mergington.edu")), ALREADY_SIGNED_UP);
    }

    #[test]
    fn test_zero_capacity_is_unlimited() {
        let r = roster(Some(0), &["a@mergington.edu", "b@mergington.edu"]);
        assert!(admit(&r, "c@mergington.edu").is_ok());

        let r = roster(None, &["a@mergington.edu"]);
        assert!(admit(&r, "c@mergington.edu").is_ok());
    }

    #[test]
    fn test_release() {
        let r = roster(Some(10), &["james@mergington.edu"]);
        assert!(release(&r, "james@mergington.edu").is_ok());
        assert_eq!(conflict_message(release(&r, "new@mergington.edu")), NOT_SIGNED_UP);
    }

    #[test]
    fn test_email_matching_is_exact() {
        let r = roster(Some(10), &["james@mergington.edu"]);
        assert!(admit(&r, "James@mergington.edu").is_ok());
        assert!(release(&r, " james@mergington.edu").is_err());
    }
}
