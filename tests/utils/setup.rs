use std::sync::Arc;

use scorebox::event::EventBus;
use scorebox::fixture::repository::InMemoryMatchRepository;
use scorebox::fixture::service::MatchService;
use scorebox::fixture::types::{CreateMatchRequest, StartMatchRequest};
use scorebox::fixture::MatchModel;
use scorebox::scoring::repository::{
    InMemoryDeliveryRepository, InMemoryScoreboardRepository, ScoreboardRepository,
};
use scorebox::scoring::service::ScoringService;
use scorebox::standings::repository::InMemoryStandingsRepository;
use scorebox::standings::service::StandingsService;
use scorebox::team::models::{PlayerModel, TeamModel};
use scorebox::team::repository::InMemoryTeamRepository;
use scorebox::team::service::TeamService;
use scorebox::team::types::{AddPlayerRequest, CreateTeamRequest};

/// A fully wired in-memory application with two teams and their squads.
pub struct TestSetup {
    pub team_service: Arc<TeamService>,
    pub match_service: Arc<MatchService>,
    pub scoring_service: Arc<ScoringService>,
    pub standings_service: Arc<StandingsService>,
    pub scoreboard_repository: Arc<dyn ScoreboardRepository>,
    pub event_bus: EventBus,
    pub team_a: TeamModel,
    pub team_b: TeamModel,
    pub team_a_players: Vec<PlayerModel>,
    pub team_b_players: Vec<PlayerModel>,
}

impl TestSetup {
    /// Schedules and starts a 20-over match between the two teams.
    pub async fn ongoing_match(&self) -> MatchModel {
        let fixture = self
            .match_service
            .create_match(CreateMatchRequest {
                team1_id: self.team_a.id.clone(),
                team2_id: self.team_b.id.clone(),
                venue: None,
                match_date: None,
                overs_per_innings: 20,
            })
            .await
            .expect("scheduling the match should succeed");

        self.match_service
            .start_match(
                &fixture.id,
                StartMatchRequest {
                    toss_winner_id: Some(self.team_a.id.clone()),
                    elected_to: None,
                    overs_per_innings: None,
                },
            )
            .await
            .expect("starting the match should succeed")
    }
}

pub struct TestSetupBuilder {
    squad_size: usize,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self { squad_size: 4 }
    }

    #[allow(dead_code)]
    pub fn with_squad_size(mut self, squad_size: usize) -> Self {
        self.squad_size = squad_size;
        self
    }

    pub async fn build(self) -> TestSetup {
        let event_bus = EventBus::new();

        let team_repository = Arc::new(InMemoryTeamRepository::new());
        let match_repository = Arc::new(InMemoryMatchRepository::new());
        let delivery_repository = Arc::new(InMemoryDeliveryRepository::new());
        let scoreboard_repository = Arc::new(InMemoryScoreboardRepository::new());
        let standings_repository = Arc::new(InMemoryStandingsRepository::new());

        let team_service = Arc::new(TeamService::new(team_repository.clone()));
        let match_service = Arc::new(MatchService::new(
            match_repository.clone(),
            team_repository.clone(),
            event_bus.clone(),
        ));
        let scoring_service = Arc::new(ScoringService::new(
            delivery_repository,
            scoreboard_repository.clone(),
            match_repository.clone(),
            team_repository.clone(),
            event_bus.clone(),
        ));
        let standings_service = Arc::new(StandingsService::new(
            match_repository,
            scoreboard_repository.clone(),
            team_repository.clone(),
            standings_repository,
        ));

        let team_a = team_service
            .create_team(CreateTeamRequest {
                name: "Alphas".to_string(),
                captain: None,
            })
            .await
            .expect("creating team A should succeed");
        let team_b = team_service
            .create_team(CreateTeamRequest {
                name: "Bravos".to_string(),
                captain: None,
            })
            .await
            .expect("creating team B should succeed");

        let mut team_a_players = Vec::new();
        let mut team_b_players = Vec::new();
        for i in 0..self.squad_size {
            team_a_players.push(
                team_service
                    .add_player(
                        &team_a.id,
                        AddPlayerRequest {
                            name: format!("Alpha {i}"),
                        },
                    )
                    .await
                    .expect("adding player should succeed"),
            );
            team_b_players.push(
                team_service
                    .add_player(
                        &team_b.id,
                        AddPlayerRequest {
                            name: format!("Bravo {i}"),
                        },
                    )
                    .await
                    .expect("adding player should succeed"),
            );
        }

        TestSetup {
            team_service,
            match_service,
            scoring_service,
            standings_service,
            scoreboard_repository,
            event_bus,
            team_a,
            team_b,
            team_a_players,
            team_b_players,
        }
    }
}

impl Default for TestSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}
