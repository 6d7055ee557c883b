use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{MatchModel, MatchStatus};
use crate::shared::AppError;

/// Trait for match repository operations
#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn create_match(&self, fixture: &MatchModel) -> Result<(), AppError>;
    async fn get_match(&self, match_id: &str) -> Result<Option<MatchModel>, AppError>;
    async fn list_matches(&self) -> Result<Vec<MatchModel>, AppError>;
    async fn list_completed(&self) -> Result<Vec<MatchModel>, AppError>;
    async fn update_match(&self, fixture: &MatchModel) -> Result<(), AppError>;
}

/// In-memory implementation of MatchRepository for development and testing
pub struct InMemoryMatchRepository {
    matches: Mutex<HashMap<String, MatchModel>>,
}

impl Default for InMemoryMatchRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        Self {
            matches: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    #[instrument(skip(self, fixture))]
    async fn create_match(&self, fixture: &MatchModel) -> Result<(), AppError> {
        debug!(match_id = %fixture.id, "Creating match in memory");

        let mut matches = self.matches.lock().unwrap();
        if matches.contains_key(&fixture.id) {
            warn!(match_id = %fixture.id, "Match already exists in memory");
            return Err(AppError::DatabaseError("Match already exists".to_string()));
        }
        matches.insert(fixture.id.clone(), fixture.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_match(&self, match_id: &str) -> Result<Option<MatchModel>, AppError> {
        let matches = self.matches.lock().unwrap();
        Ok(matches.get(match_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_matches(&self) -> Result<Vec<MatchModel>, AppError> {
        let matches = self.matches.lock().unwrap();
        let mut all: Vec<MatchModel> = matches.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    #[instrument(skip(self))]
    async fn list_completed(&self) -> Result<Vec<MatchModel>, AppError> {
        let matches = self.matches.lock().unwrap();
        let mut completed: Vec<MatchModel> = matches
            .values()
            .filter(|m| m.status == MatchStatus::Completed)
            .cloned()
            .collect();
        completed.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(completed)
    }

    #[instrument(skip(self, fixture))]
    async fn update_match(&self, fixture: &MatchModel) -> Result<(), AppError> {
        let mut matches = self.matches.lock().unwrap();
        if !matches.contains_key(&fixture.id) {
            warn!(match_id = %fixture.id, "Match not found for update");
            return Err(AppError::NotFound("Match not found".to_string()));
        }
        matches.insert(fixture.id.clone(), fixture.clone());
        Ok(())
    }
}
