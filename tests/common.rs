use roster_backend::{
    api::router::create_router,
    config::Config,
    infra::factory::bootstrap_state,
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use std::str::FromStr;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use serde_json::Value;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
pub fn test_config(db_filename: &str) -> Config {
    Config {
        database_url: format!("sqlite://{}?mode=rwc", db_filename),
        port: 0,
        static_dir: "static".to_string(),
        seed_on_startup: true,
        max_connections: Some(5),
    }
}

#[allow(dead_code)]
impl TestApp {
    /// Fresh database file, migrated and seeded with the default catalog.
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        Self::on_file(db_filename, true).await
    }

    /// Starts the app against an existing (or new) database file, as a restart would.
    pub async fn on_file(db_filename: String, seed_on_startup: bool) -> Self {
        let mut config = test_config(&db_filename);
        config.seed_on_startup = seed_on_startup;

        let state = Arc::new(bootstrap_state(&config).await.expect("Failed to bootstrap test app"));

        let connection_options = SqliteConnectOptions::from_str(&config.database_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn request(&self, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        ).await.unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn activities(&self) -> Value {
        let (status, body) = self.request("GET", "/activities").await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    pub async fn participants(&self, activity: &str) -> Vec<String> {
        let body = self.activities().await;
        body[activity]["participants"]
            .as_array()
            .unwrap_or_else(|| panic!("{} missing from listing", activity))
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    pub async fn signup(&self, activity: &str, email: &str) -> (StatusCode, Value) {
        self.request("POST", &format!("/activities/{}/signup?email={}", encode(activity), encode(email))).await
    }

    pub async fn unregister(&self, activity: &str, email: &str) -> (StatusCode, Value) {
        self.request("DELETE", &format!("/activities/{}/unregister?email={}", encode(activity), encode(email))).await
    }

    /// Inserts an activity directly, bypassing the catalog.
    pub async fn insert_activity(&self, name: &str, max_participants: Option<i64>, participants: &[&str]) {
        sqlx::query("INSERT INTO activities (name, description, schedule, max_participants) VALUES (?, ?, ?, ?)")
            .bind(name).bind("Test activity").bind("Whenever").bind(max_participants)
            .execute(&self.pool).await.unwrap();
        for email in participants {
            sqlx::query("INSERT INTO participants (email, activity_name) VALUES (?, ?)")
                .bind(*email).bind(name)
                .execute(&self.pool).await.unwrap();
        }
    }
}

#[allow(dead_code)]
pub fn encode(raw: &str) -> String {
    raw.replace('%', "%25")
        .replace(' ', "%20")
        .replace('@', "%40")
        .replace('+', "%2B")
        .replace('&', "%26")
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
