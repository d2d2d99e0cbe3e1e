use std::sync::Arc;

use crate::{
    config::Config,
    db::connection::DbPool,
    repositories::{CheckInRepositoryTrait, InMemoryCheckInRepository, PgCheckInRepository},
    services::ledger::CheckInLedger,
    utils::time::{Clock, SystemClock},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub ledger: Arc<CheckInLedger>,
}

impl AppState {
    pub fn new(config: Config, ledger: CheckInLedger) -> Self {
        Self {
            config,
            ledger: Arc::new(ledger),
        }
    }

    /// State backed by Postgres and the system clock.
    pub fn with_pool(pool: DbPool, config: Config) -> Self {
        let repo: Arc<dyn CheckInRepositoryTrait> = Arc::new(PgCheckInRepository::new(pool));
        Self::with_repository(repo, Arc::new(SystemClock), config)
    }

    /// State backed by the in-process store; records are lost on restart.
    pub fn in_memory(config: Config, clock: Arc<dyn Clock>) -> Self {
        let repo: Arc<dyn CheckInRepositoryTrait> = Arc::new(InMemoryCheckInRepository::new());
        Self::with_repository(repo, clock, config)
    }

    pub fn with_repository(
        repo: Arc<dyn CheckInRepositoryTrait>,
        clock: Arc<dyn Clock>,
        config: Config,
    ) -> Self {
        let ledger = CheckInLedger::new(repo, clock, config.time_zone);
        Self::new(config, ledger)
    }
}
