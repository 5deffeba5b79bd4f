use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: i64,
    pub email: String,
    pub activity_name: String,
}
