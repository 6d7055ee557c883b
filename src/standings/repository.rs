use async_trait::async_trait;
use std::sync::Mutex;
use tracing::{debug, instrument};

use super::models::Standing;
use crate::shared::AppError;

/// Trait for the persisted tournament table
///
/// The table is a cache of `calculator::compute_standings`: it is always
/// replaced wholesale, never patched row by row.
#[async_trait]
pub trait StandingsRepository: Send + Sync {
    async fn replace_all(&self, standings: &[Standing]) -> Result<(), AppError>;
    async fn list(&self) -> Result<Vec<Standing>, AppError>;
}

/// In-memory implementation of StandingsRepository for development and testing
pub struct InMemoryStandingsRepository {
    standings: Mutex<Vec<Standing>>,
}

impl Default for InMemoryStandingsRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStandingsRepository {
    pub fn new() -> Self {
        Self {
            standings: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StandingsRepository for InMemoryStandingsRepository {
    #[instrument(skip(self, standings))]
    async fn replace_all(&self, standings: &[Standing]) -> Result<(), AppError> {
        debug!(team_count = standings.len(), "Replacing cached standings");
        let mut cached = self.standings.lock().unwrap();
        *cached = standings.to_vec();
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Standing>, AppError> {
        let cached = self.standings.lock().unwrap();
        Ok(cached.clone())
    }
}
