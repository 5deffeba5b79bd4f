use std::env;
use std::str::FromStr;

use crate::error::AppError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://activities.db";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub static_dir: String,
    pub seed_on_startup: bool,
    pub max_connections: Option<u32>, // falls back to a per-backend default
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            port: parse_var("PORT")?.unwrap_or(8000),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
            seed_on_startup: parse_var("SEED_ON_STARTUP")?.unwrap_or(true),
            max_connections: parse_var("DB_MAX_CONNECTIONS")?,
        })
    }

    pub fn is_postgres(&self) -> bool {
        self.database_url.starts_with("postgres://") || self.database_url.starts_with("postgresql://")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            port: 8000,
            static_dir: "static".to_string(),
            seed_on_startup: true,
            max_connections: None,
        }
    }
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{} has an invalid value: {:?}", key, raw))),
        Err(_) => Ok(None),
    }
}
