use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct Activity {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: Option<i64>,
}

/// An activity together with the emails enrolled in it, in enrollment order.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ActivityRoster {
    pub activity: Activity,
    pub participants: Vec<String>,
}

impl ActivityRoster {
    pub fn new(activity: Activity, participants: Vec<String>) -> Self {
        Self { activity, participants }
    }

    /// Enforced capacity. Unset, zero and negative values all mean "no limit".
    pub fn capacity(&self) -> Option<i64> {
        self.activity.max_participants.filter(|max| *max > 0)
    }

    pub fn is_enrolled(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }

    pub fn is_full(&self) -> bool {
        match self.capacity() {
            Some(max) => self.participants.len() as i64 >= max,
            None => false,
        }
    }

    pub fn spots_left(&self) -> Option<i64> {
        self.capacity()
            .map(|max| (max - self.participants.len() as i64).max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(max: Option<i64>, participants: &[&str]) -> ActivityRoster {
        ActivityRoster::new(
            Activity {
                name: "Chess Club".to_string(),
                description: "Learn strategies".to_string(),
                schedule: "Fridays".to_string(),
                max_participants: max,
            },
            participants.iter().map(|p| p.to_string()).collect(),
        )
    }

    #[test]
    fn test_zero_and_unset_capacity_mean_unlimited() {
        assert_eq!(roster(None, &["a@x.edu"]).capacity(), None);
        assert_eq!(roster(Some(0), &["a@x.edu"]).capacity(), None);
        assert!(!roster(Some(0), &["a@x.edu", "b@x.edu"]).is_full());
        assert_eq!(roster(None, &[]).spots_left(), None);
    }

    #[test]
    fn test_full_when_count_reaches_capacity() {
        let r = roster(Some(2), &["a@x.edu", "b@x.edu"]);
        assert!(r.is_full());
        assert_eq!(r.spots_left(), Some(0));

        let r = roster(Some(3), &["a@x.edu"]);
        assert!(!r.is_full());
        assert_eq!(r.spots_left(), Some(2));
    }
}
