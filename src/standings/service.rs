use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use super::{calculator::compute_standings, models::Standing, repository::StandingsRepository};
use crate::event::{EventBus, EventError, MatchEvent, MatchEventHandler};
use crate::fixture::models::MatchStatus;
use crate::fixture::repository::MatchRepository;
use crate::scoring::repository::ScoreboardRepository;
use crate::shared::AppError;
use crate::team::repository::TeamRepository;

/// Service that derives and caches the tournament table.
pub struct StandingsService {
    matches: Arc<dyn MatchRepository>,
    scoreboards: Arc<dyn ScoreboardRepository>,
    teams: Arc<dyn TeamRepository>,
    repository: Arc<dyn StandingsRepository>,
}

impl StandingsService {
    pub fn new(
        matches: Arc<dyn MatchRepository>,
        scoreboards: Arc<dyn ScoreboardRepository>,
        teams: Arc<dyn TeamRepository>,
        repository: Arc<dyn StandingsRepository>,
    ) -> Self {
        Self {
            matches,
            scoreboards,
            teams,
            repository,
        }
    }

    /// Rebuilds the whole table from the completed-match results and caches
    /// it. Always a full recompute; the cache can never drift from the
    /// underlying results.
    #[instrument(skip(self))]
    pub async fn recompute(&self) -> Result<Vec<Standing>, AppError> {
        let completed = self.matches.list_completed().await?;
        let match_ids: Vec<String> = completed.iter().map(|m| m.id.clone()).collect();
        let rows = self.scoreboards.rows_for_matches(&match_ids).await?;

        let team_names: HashMap<String, String> = self
            .teams
            .list_teams()
            .await?
            .into_iter()
            .map(|team| (team.id, team.name))
            .collect();

        let standings = compute_standings(&completed, &rows, &team_names);
        self.repository.replace_all(&standings).await?;

        info!(team_count = standings.len(), "Standings recomputed");
        Ok(standings)
    }

    /// The current table: the cached copy when one exists, otherwise a
    /// fresh recompute.
    #[instrument(skip(self))]
    pub async fn standings(&self) -> Result<Vec<Standing>, AppError> {
        let cached = self.repository.list().await?;
        if cached.is_empty() {
            return self.recompute().await;
        }
        Ok(cached)
    }
}

/// Recomputes the tournament table whenever a match completes.
pub struct StandingsSubscriber {
    standings_service: Arc<StandingsService>,
    event_bus: EventBus,
}

impl StandingsSubscriber {
    pub fn new(standings_service: Arc<StandingsService>, event_bus: EventBus) -> Self {
        Self {
            standings_service,
            event_bus,
        }
    }
}

#[async_trait]
impl MatchEventHandler for StandingsSubscriber {
    async fn handle(&self, event: &MatchEvent) -> Result<(), EventError> {
        if let MatchEvent::StatusChanged {
            match_id,
            status: MatchStatus::Completed,
        } = event
        {
            let standings = self
                .standings_service
                .recompute()
                .await
                .map_err(|e| EventError::retryable(e.to_string()))?;

            self.event_bus
                .emit(MatchEvent::StandingsUpdated {
                    match_id: match_id.clone(),
                    standings,
                })
                .await;
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "StandingsSubscriber"
    }
}
