use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{PlayerModel, TeamModel},
    repository::TeamRepository,
    types::{AddPlayerRequest, CreateTeamRequest},
};
use crate::shared::AppError;

/// Service for team and roster business logic
pub struct TeamService {
    repository: Arc<dyn TeamRepository>,
}

impl TeamService {
    pub fn new(repository: Arc<dyn TeamRepository>) -> Self {
        Self { repository }
    }

    /// Registers a new team. The name is required; the captain is optional
    /// and both are stored trimmed.
    #[instrument(skip(self, request))]
    pub async fn create_team(&self, request: CreateTeamRequest) -> Result<TeamModel, AppError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Team name is required".to_string()));
        }

        let captain = request
            .captain
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let team = TeamModel::new(name.to_string(), captain);
        self.repository.create_team(&team).await?;

        info!(team_id = %team.id, name = %team.name, "Team registered");
        Ok(team)
    }

    #[instrument(skip(self))]
    pub async fn get_team(&self, team_id: &str) -> Result<Option<TeamModel>, AppError> {
        self.repository.get_team(team_id).await
    }

    #[instrument(skip(self))]
    pub async fn list_teams(&self) -> Result<Vec<TeamModel>, AppError> {
        self.repository.list_teams().await
    }

    #[instrument(skip(self))]
    pub async fn delete_team(&self, team_id: &str) -> Result<(), AppError> {
        self.repository.delete_team(team_id).await?;
        info!(team_id = %team_id, "Team deleted");
        Ok(())
    }

    /// Adds a player to a team's roster.
    #[instrument(skip(self, request))]
    pub async fn add_player(
        &self,
        team_id: &str,
        request: AddPlayerRequest,
    ) -> Result<PlayerModel, AppError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Player name is required".to_string()));
        }

        let player = PlayerModel::new(team_id.to_string(), name.to_string());
        self.repository.add_player(&player).await?;

        info!(player_id = %player.id, team_id = %team_id, "Player added to roster");
        Ok(player)
    }

    #[instrument(skip(self))]
    pub async fn roster(&self, team_id: &str) -> Result<Vec<PlayerModel>, AppError> {
        if self.repository.get_team(team_id).await?.is_none() {
            return Err(AppError::NotFound("Team not found".to_string()));
        }
        self.repository.roster(team_id).await
    }
}
