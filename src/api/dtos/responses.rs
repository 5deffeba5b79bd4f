use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::models::activity::ActivityRoster;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ActivityDetails {
    pub description: String,
    pub schedule: String,
    pub max_participants: Option<i64>,
    pub participants: Vec<String>,
}

impl From<ActivityRoster> for ActivityDetails {
    fn from(roster: ActivityRoster) -> Self {
        Self {
            description: roster.activity.description,
            schedule: roster.activity.schedule,
            max_participants: roster.activity.max_participants,
            participants: roster.participants,
        }
    }
}

/// Activity name to details, the shape `GET /activities` has always returned.
pub type ActivitiesResponse = BTreeMap<String, ActivityDetails>;

pub fn to_activities_response(rosters: Vec<ActivityRoster>) -> ActivitiesResponse {
    rosters
        .into_iter()
        .map(|roster| (roster.activity.name.clone(), ActivityDetails::from(roster)))
        .collect()
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}
