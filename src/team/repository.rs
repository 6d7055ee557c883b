use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{PlayerModel, TeamModel};
use crate::shared::AppError;

/// Trait for team and roster repository operations
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn create_team(&self, team: &TeamModel) -> Result<(), AppError>;
    async fn get_team(&self, team_id: &str) -> Result<Option<TeamModel>, AppError>;
    async fn list_teams(&self) -> Result<Vec<TeamModel>, AppError>;
    /// Removes the team and its roster.
    async fn delete_team(&self, team_id: &str) -> Result<(), AppError>;

    async fn add_player(&self, player: &PlayerModel) -> Result<(), AppError>;
    async fn get_player(&self, player_id: &str) -> Result<Option<PlayerModel>, AppError>;
    /// Roster of one team, in the order players were added.
    async fn roster(&self, team_id: &str) -> Result<Vec<PlayerModel>, AppError>;
    /// All players of the given teams, in roster order per team.
    async fn players_for_teams(&self, team_ids: &[String]) -> Result<Vec<PlayerModel>, AppError>;
}

/// In-memory implementation of TeamRepository for development and testing
pub struct InMemoryTeamRepository {
    teams: Mutex<HashMap<String, TeamModel>>,
    players: Mutex<Vec<PlayerModel>>,
}

impl Default for InMemoryTeamRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self {
            teams: Mutex::new(HashMap::new()),
            players: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    #[instrument(skip(self, team))]
    async fn create_team(&self, team: &TeamModel) -> Result<(), AppError> {
        debug!(team_id = %team.id, name = %team.name, "Creating team in memory");

        let mut teams = self.teams.lock().unwrap();
        if teams.values().any(|t| t.name == team.name) {
            warn!(name = %team.name, "Team name already taken");
            return Err(AppError::Conflict("Team name already taken".to_string()));
        }
        teams.insert(team.id.clone(), team.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_team(&self, team_id: &str) -> Result<Option<TeamModel>, AppError> {
        let teams = self.teams.lock().unwrap();
        Ok(teams.get(team_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_teams(&self) -> Result<Vec<TeamModel>, AppError> {
        let teams = self.teams.lock().unwrap();
        let mut all: Vec<TeamModel> = teams.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    #[instrument(skip(self))]
    async fn delete_team(&self, team_id: &str) -> Result<(), AppError> {
        let mut teams = self.teams.lock().unwrap();
        if teams.remove(team_id).is_none() {
            return Err(AppError::NotFound("Team not found".to_string()));
        }
        let mut players = self.players.lock().unwrap();
        players.retain(|p| p.team_id != team_id);
        Ok(())
    }

    #[instrument(skip(self, player))]
    async fn add_player(&self, player: &PlayerModel) -> Result<(), AppError> {
        let teams = self.teams.lock().unwrap();
        if !teams.contains_key(&player.team_id) {
            return Err(AppError::NotFound("Team not found".to_string()));
        }
        drop(teams);

        let mut players = self.players.lock().unwrap();
        players.push(player.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_player(&self, player_id: &str) -> Result<Option<PlayerModel>, AppError> {
        let players = self.players.lock().unwrap();
        Ok(players.iter().find(|p| p.id == player_id).cloned())
    }

    #[instrument(skip(self))]
    async fn roster(&self, team_id: &str) -> Result<Vec<PlayerModel>, AppError> {
        let players = self.players.lock().unwrap();
        Ok(players
            .iter()
            .filter(|p| p.team_id == team_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn players_for_teams(&self, team_ids: &[String]) -> Result<Vec<PlayerModel>, AppError> {
        let players = self.players.lock().unwrap();
        Ok(players
            .iter()
            .filter(|p| team_ids.contains(&p.team_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_and_lists_teams() {
        let repo = InMemoryTeamRepository::new();
        repo.create_team(&TeamModel::new("Falcons".to_string(), None))
            .await
            .unwrap();
        repo.create_team(&TeamModel::new("Eagles".to_string(), Some("Sam".to_string())))
            .await
            .unwrap();

        let teams = repo.list_teams().await.unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].name, "Eagles"); // sorted by name
    }

    #[tokio::test]
    async fn rejects_duplicate_team_names() {
        let repo = InMemoryTeamRepository::new();
        repo.create_team(&TeamModel::new("Falcons".to_string(), None))
            .await
            .unwrap();

        let result = repo
            .create_team(&TeamModel::new("Falcons".to_string(), None))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn roster_preserves_insertion_order() {
        let repo = InMemoryTeamRepository::new();
        let team = TeamModel::new("Falcons".to_string(), None);
        repo.create_team(&team).await.unwrap();

        for name in ["Asha", "Bina", "Chitra"] {
            repo.add_player(&PlayerModel::new(team.id.clone(), name.to_string()))
                .await
                .unwrap();
        }

        let roster = repo.roster(&team.id).await.unwrap();
        let names: Vec<&str> = roster.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Asha", "Bina", "Chitra"]);
    }

    #[tokio::test]
    async fn players_cannot_join_unknown_teams() {
        let repo = InMemoryTeamRepository::new();
        let result = repo
            .add_player(&PlayerModel::new("ghost-team".to_string(), "Asha".to_string()))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn deleting_a_team_removes_its_roster() {
        let repo = InMemoryTeamRepository::new();
        let team = TeamModel::new("Falcons".to_string(), None);
        repo.create_team(&team).await.unwrap();
        repo.add_player(&PlayerModel::new(team.id.clone(), "Asha".to_string()))
            .await
            .unwrap();

        repo.delete_team(&team.id).await.unwrap();

        assert!(repo.get_team(&team.id).await.unwrap().is_none());
        assert!(repo.roster(&team.id).await.unwrap().is_empty());
    }
}
