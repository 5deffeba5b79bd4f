use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::domain::ports::RosterRepository;
use crate::infra::repositories::{
    postgres_roster_repo::PostgresRosterRepo,
    sqlite_roster_repo::SqliteRosterRepo,
};

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let roster_repo = connect_roster_repo(config).await?;
    let state = AppState::new(config.clone(), roster_repo);

    if config.seed_on_startup {
        state.roster_service.seed_default_catalog().await?;
    } else {
        info!("SEED_ON_STARTUP disabled, leaving store untouched");
    }

    Ok(state)
}

pub async fn connect_roster_repo(config: &Config) -> Result<Arc<dyn RosterRepository>, AppError> {
    let database_url = &config.database_url;

    if config.is_postgres() {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse()?;
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections.unwrap_or(10))
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;

        Ok(Arc::new(PostgresRosterRepo::new(pool)))
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let pool = connect_sqlite(database_url, config.max_connections.unwrap_or(5)).await?;

        run_sqlite_migrations(&pool).await?;

        Ok(Arc::new(SqliteRosterRepo::new(pool)))
    }
}

pub async fn connect_sqlite(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(opts)
        .await?;

    Ok(pool)
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres").run(pool).await?;
    Ok(())
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite").run(pool).await?;
    Ok(())
}
