use std::sync::Arc;
use crate::domain::ports::RosterRepository;
use crate::domain::services::roster::RosterService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub roster_repo: Arc<dyn RosterRepository>,
    pub roster_service: Arc<RosterService>,
}

impl AppState {
    pub fn new(config: Config, roster_repo: Arc<dyn RosterRepository>) -> Self {
        let roster_service = Arc::new(RosterService::new(roster_repo.clone()));
        Self { config, roster_repo, roster_service }
    }
}
