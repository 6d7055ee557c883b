use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::{MatchModel, MatchStatus},
    repository::MatchRepository,
    types::{CreateMatchRequest, StartMatchRequest, UpdateStatusRequest},
};
use crate::event::{EventBus, MatchEvent};
use crate::shared::AppError;
use crate::team::repository::TeamRepository;

/// Service for match lifecycle business logic: scheduling, the toss,
/// status transitions and result recording.
pub struct MatchService {
    repository: Arc<dyn MatchRepository>,
    teams: Arc<dyn TeamRepository>,
    event_bus: EventBus,
}

impl MatchService {
    pub fn new(
        repository: Arc<dyn MatchRepository>,
        teams: Arc<dyn TeamRepository>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            repository,
            teams,
            event_bus,
        }
    }

    /// Schedules a new match between two existing, distinct teams.
    #[instrument(skip(self, request))]
    pub async fn create_match(&self, request: CreateMatchRequest) -> Result<MatchModel, AppError> {
        if request.team1_id == request.team2_id {
            return Err(AppError::BadRequest(
                "A match needs two different teams".to_string(),
            ));
        }

        if !(1..=90).contains(&request.overs_per_innings) {
            return Err(AppError::BadRequest(
                "Overs per innings must be between 1 and 90".to_string(),
            ));
        }

        for team_id in [&request.team1_id, &request.team2_id] {
            if self.teams.get_team(team_id).await?.is_none() {
                return Err(AppError::BadRequest(format!("Team not found: {team_id}")));
            }
        }

        let fixture = MatchModel::new(
            request.team1_id,
            request.team2_id,
            request.venue,
            request.match_date,
            request.overs_per_innings,
        );
        self.repository.create_match(&fixture).await?;

        info!(match_id = %fixture.id, "Match scheduled");
        Ok(fixture)
    }

    #[instrument(skip(self))]
    pub async fn get_match(&self, match_id: &str) -> Result<Option<MatchModel>, AppError> {
        self.repository.get_match(match_id).await
    }

    #[instrument(skip(self))]
    pub async fn list_matches(&self) -> Result<Vec<MatchModel>, AppError> {
        self.repository.list_matches().await
    }

    /// Starts an upcoming match, recording the toss and any format override.
    #[instrument(skip(self, request))]
    pub async fn start_match(
        &self,
        match_id: &str,
        request: StartMatchRequest,
    ) -> Result<MatchModel, AppError> {
        let mut fixture = self
            .repository
            .get_match(match_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Match not found".to_string()))?;

        if fixture.status != MatchStatus::Upcoming {
            return Err(AppError::BadRequest(
                "Only upcoming matches can be started".to_string(),
            ));
        }

        if let Some(toss_winner) = &request.toss_winner_id {
            if !fixture.involves(toss_winner) {
                return Err(AppError::BadRequest(
                    "Toss winner must be one of the two teams".to_string(),
                ));
            }
            fixture.toss_winner_id = Some(toss_winner.clone());
        }
        if let Some(elected_to) = request.elected_to {
            fixture.elected_to = Some(elected_to);
        }
        if let Some(overs) = request.overs_per_innings {
            if !(1..=90).contains(&overs) {
                return Err(AppError::BadRequest(
                    "Overs per innings must be between 1 and 90".to_string(),
                ));
            }
            fixture.overs_per_innings = overs;
        }

        fixture.status = MatchStatus::Ongoing;
        self.repository.update_match(&fixture).await?;

        info!(match_id = %fixture.id, "Match started");
        self.event_bus
            .emit(MatchEvent::StatusChanged {
                match_id: fixture.id.clone(),
                status: MatchStatus::Ongoing,
            })
            .await;

        Ok(fixture)
    }

    /// Applies a status transition. A completed match can never be reopened,
    /// and a winner is only retained while the match stays completed.
    #[instrument(skip(self, request))]
    pub async fn set_status(
        &self,
        match_id: &str,
        request: UpdateStatusRequest,
    ) -> Result<MatchModel, AppError> {
        let mut fixture = self
            .repository
            .get_match(match_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Match not found".to_string()))?;

        if fixture.status == MatchStatus::Completed && request.status != MatchStatus::Completed {
            return Err(AppError::BadRequest(
                "Completed matches cannot be reopened".to_string(),
            ));
        }

        if request.status == MatchStatus::Completed {
            if let Some(winner_id) = &request.winner_id {
                if !fixture.involves(winner_id) {
                    return Err(AppError::BadRequest(
                        "Winner must be one of the two teams".to_string(),
                    ));
                }
                fixture.winner_id = Some(winner_id.clone());
            }
        } else {
            debug!(match_id = %fixture.id, "Clearing winner on non-completed status");
            fixture.winner_id = None;
        }

        fixture.status = request.status;
        self.repository.update_match(&fixture).await?;

        info!(match_id = %fixture.id, status = %fixture.status, "Match status updated");
        self.event_bus
            .emit(MatchEvent::StatusChanged {
                match_id: fixture.id.clone(),
                status: fixture.status,
            })
            .await;

        Ok(fixture)
    }
}
