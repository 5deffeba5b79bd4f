use std::collections::HashMap;

use crate::domain::{
    models::{activity::{Activity, ActivityRoster}, participant::Participant},
    ports::RosterRepository,
    services::{catalog::{SeedActivity, SeedOutcome}, roster},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

pub struct PostgresRosterRepo {
    pool: PgPool,
}

impl PostgresRosterRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn load_participants(conn: &mut PgConnection, activity_name: &str) -> Result<Vec<String>, AppError> {
    sqlx::query_scalar::<_, String>("SELECT email FROM participants WHERE activity_name = $1 ORDER BY id")
        .bind(activity_name)
        .fetch_all(&mut *conn)
        .await
        .map_err(AppError::Database)
}

/// Reads the activity and its participants. With `for_update` the activity row
/// stays locked until the surrounding transaction ends.
async fn load_roster(conn: &mut PgConnection, activity_name: &str, for_update: bool) -> Result<Option<ActivityRoster>, AppError> {
    let sql = if for_update {
        "SELECT name, description, schedule, max_participants FROM activities WHERE name = $1 FOR UPDATE"
    } else {
        "SELECT name, description, schedule, max_participants FROM activities WHERE name = $1"
    };
    let activity = sqlx::query_as::<_, Activity>(sql)
        .bind(activity_name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::Database)?;

    match activity {
        Some(activity) => {
            let participants = load_participants(conn, activity_name).await?;
            Ok(Some(ActivityRoster::new(activity, participants)))
        }
        None => Ok(None),
    }
}

#[async_trait]
impl RosterRepository for PostgresRosterRepo {
    async fn list_activities(&self) -> Result<Vec<ActivityRoster>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        let activities = sqlx::query_as::<_, Activity>("SELECT name, description, schedule, max_participants FROM activities ORDER BY name")
            .fetch_all(&mut *tx).await.map_err(AppError::Database)?;
        let participants = sqlx::query_as::<_, Participant>("SELECT id, email, activity_name FROM participants ORDER BY id")
            .fetch_all(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;

        let mut by_activity: HashMap<String, Vec<String>> = HashMap::new();
        for p in participants {
            by_activity.entry(p.activity_name).or_default().push(p.email);
        }

        Ok(activities
            .into_iter()
            .map(|activity| {
                let emails = by_activity.remove(&activity.name).unwrap_or_default();
                ActivityRoster::new(activity, emails)
            })
            .collect())
    }

    async fn find_activity(&self, name: &str) -> Result<Option<ActivityRoster>, AppError> {
        let mut conn = self.pool.acquire().await.map_err(AppError::Database)?;
        load_roster(&mut conn, name, false).await
    }

    async fn enroll(&self, activity_name: &str, email: &str) -> Result<Participant, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let current = load_roster(&mut tx, activity_name, true).await?
            .ok_or_else(AppError::activity_not_found)?;

        roster::admit(&current, email)?;

        let created = sqlx::query_as::<_, Participant>(
            "INSERT INTO participants (email, activity_name) VALUES ($1, $2) RETURNING id, email, activity_name"
        )
            .bind(email).bind(activity_name)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn withdraw(&self, activity_name: &str, email: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let current = load_roster(&mut tx, activity_name, true).await?
            .ok_or_else(AppError::activity_not_found)?;

        roster::release(&current, email)?;

        sqlx::query("DELETE FROM participants WHERE activity_name = $1 AND email = $2")
            .bind(activity_name).bind(email)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn count_activities(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM activities")
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn seed_if_empty(&self, catalog: &[SeedActivity]) -> Result<SeedOutcome, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Serializes concurrent seeders; released at commit.
        sqlx::query("LOCK TABLE activities IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM activities")
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        if existing > 0 {
            return Ok(SeedOutcome::AlreadySeeded);
        }

        let mut participants = 0;
        for entry in catalog {
            sqlx::query("INSERT INTO activities (name, description, schedule, max_participants) VALUES ($1, $2, $3, $4)")
                .bind(entry.name).bind(entry.description).bind(entry.schedule).bind(entry.max_participants)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
            for email in entry.participants {
                sqlx::query("INSERT INTO participants (email, activity_name) VALUES ($1, $2)")
                    .bind(*email).bind(entry.name)
                    .execute(&mut *tx).await.map_err(AppError::Database)?;
                participants += 1;
            }
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(SeedOutcome::Seeded { activities: catalog.len(), participants })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
}
