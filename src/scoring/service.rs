use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{debug, info, instrument};

use super::{
    errors::ScoringError,
    innings::{aggregate_innings, free_hit_follows, next_ball_slot, InningsTotals},
    models::{Delivery, ScoreboardRow},
    overs::overs_to_balls,
    repository::{DeliveryRepository, ScoreboardRepository},
    scoreboard::{aggregate_scoreboard, chase_state, normalise_snapshot, ChasingInnings, LiveScoreboard},
    scorecard::{build_scorecard, MatchHeader, Scorecard, TeamRef},
    types::{AmendBallRequest, RecordBallRequest},
};
use crate::event::{EventBus, EventError, MatchEvent, MatchEventHandler};
use crate::fixture::models::{MatchModel, MatchStatus};
use crate::fixture::repository::MatchRepository;
use crate::team::repository::TeamRepository;

/// Service owning the ball-by-ball write path and every per-match derived
/// view (live scoreboard, snapshot rows, scorecard).
///
/// All reads replay the full delivery log; nothing here keeps running
/// counters that could drift from it.
pub struct ScoringService {
    deliveries: Arc<dyn DeliveryRepository>,
    scoreboards: Arc<dyn ScoreboardRepository>,
    matches: Arc<dyn MatchRepository>,
    teams: Arc<dyn TeamRepository>,
    event_bus: EventBus,
    /// Serializes slot assignment per match so two operators cannot claim
    /// the same over/ball.
    match_locks: Arc<RwLock<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl ScoringService {
    pub fn new(
        deliveries: Arc<dyn DeliveryRepository>,
        scoreboards: Arc<dyn ScoreboardRepository>,
        matches: Arc<dyn MatchRepository>,
        teams: Arc<dyn TeamRepository>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            deliveries,
            scoreboards,
            matches,
            teams,
            event_bus,
            match_locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Records one delivery: validates it against the match and rosters,
    /// assigns its over/ball slot and free-hit flag from the existing log,
    /// appends it, and refreshes the scoreboard snapshot.
    #[instrument(skip(self, request))]
    pub async fn record_ball(
        &self,
        match_id: &str,
        request: RecordBallRequest,
    ) -> Result<Delivery, ScoringError> {
        let match_lock = self.match_lock(match_id).await;
        let _guard = match_lock.lock().await;

        let fixture = self.require_match(match_id).await?;

        if !(1..=2).contains(&request.innings) {
            return Err(ScoringError::Validation(
                "Innings must be 1 or 2".to_string(),
            ));
        }
        validate_ball_facts(
            request.runs,
            request.extras,
            request.extra_type.is_some(),
            request.wicket_type.is_some(),
            request.wicket_player_id.as_deref(),
        )?;

        let batting_team = fixture.batting_team_id(request.innings);
        let bowling_team = fixture.bowling_team_id(request.innings);

        let batsman = self
            .teams
            .get_player(&request.batsman_id)
            .await?
            .ok_or_else(|| ScoringError::Validation("Batsman not found".to_string()))?;
        if batsman.team_id != batting_team {
            return Err(ScoringError::Validation(
                "Selected batsman is not part of the batting team for this innings".to_string(),
            ));
        }

        let bowler = self
            .teams
            .get_player(&request.bowler_id)
            .await?
            .ok_or_else(|| ScoringError::Validation("Bowler not found".to_string()))?;
        if bowler.team_id != bowling_team {
            return Err(ScoringError::Validation(
                "Selected bowler is not part of the bowling team for this innings".to_string(),
            ));
        }

        // Without a wicket there is no dismissed player.
        let wicket_player_id = if request.wicket_type.is_some() {
            let dismissed_id = request.wicket_player_id.as_deref().unwrap_or_default();
            let dismissed = self
                .teams
                .get_player(dismissed_id)
                .await?
                .ok_or_else(|| ScoringError::Validation("Dismissed player not found".to_string()))?;
            if dismissed.team_id != batting_team {
                return Err(ScoringError::Validation(
                    "Dismissed player must belong to the batting team".to_string(),
                ));
            }
            Some(dismissed.id)
        } else {
            None
        };

        let last = self.deliveries.last_slot(match_id, request.innings).await?;
        let (over_number, ball_number) = next_ball_slot(last.as_ref());

        let arrivals = self
            .deliveries
            .list_in_arrival_order(match_id, request.innings)
            .await?;
        let is_free_hit = free_hit_follows(arrivals.last());

        let delivery = Delivery {
            id: uuid::Uuid::new_v4().to_string(),
            match_id: match_id.to_string(),
            innings: request.innings,
            over_number,
            ball_number,
            batsman_id: batsman.id,
            bowler_id: bowler.id,
            runs: request.runs,
            extras: request.extras,
            extra_type: request.extra_type,
            wicket_type: request.wicket_type,
            wicket_player_id,
            is_free_hit,
            created_at: Utc::now(),
        };

        self.deliveries.insert(&delivery).await?;

        info!(
            match_id = %match_id,
            innings = delivery.innings,
            over = delivery.over_number,
            ball = delivery.ball_number,
            free_hit = delivery.is_free_hit,
            "Delivery recorded"
        );

        let rows = self.refresh_scoreboard(&fixture).await?;

        self.event_bus
            .emit(MatchEvent::BallRecorded {
                match_id: match_id.to_string(),
                delivery: delivery.clone(),
            })
            .await;
        self.event_bus
            .emit(MatchEvent::ScoreboardUpdated {
                match_id: match_id.to_string(),
                rows,
            })
            .await;

        Ok(delivery)
    }

    /// Corrects the recorded facts of a delivery. Its over/ball slot is
    /// kept; every derived view is rebuilt from the updated log.
    #[instrument(skip(self, request))]
    pub async fn amend_ball(
        &self,
        match_id: &str,
        delivery_id: &str,
        request: AmendBallRequest,
    ) -> Result<Delivery, ScoringError> {
        let match_lock = self.match_lock(match_id).await;
        let _guard = match_lock.lock().await;

        let fixture = self.require_match(match_id).await?;

        let mut delivery = self
            .deliveries
            .get(delivery_id)
            .await?
            .filter(|d| d.match_id == match_id)
            .ok_or_else(|| ScoringError::DeliveryNotFound(delivery_id.to_string()))?;

        validate_ball_facts(
            request.runs,
            request.extras,
            request.extra_type.is_some(),
            request.wicket_type.is_some(),
            request.wicket_player_id.as_deref(),
        )?;

        delivery.runs = request.runs;
        delivery.extras = request.extras;
        delivery.extra_type = request.extra_type;
        delivery.wicket_type = request.wicket_type;
        delivery.wicket_player_id = if request.wicket_type.is_some() {
            request.wicket_player_id
        } else {
            None
        };

        self.deliveries.update(&delivery).await?;
        info!(match_id = %match_id, delivery_id = %delivery_id, "Delivery corrected");

        let rows = self.refresh_scoreboard(&fixture).await?;

        self.event_bus
            .emit(MatchEvent::BallCorrected {
                match_id: match_id.to_string(),
                delivery: delivery.clone(),
            })
            .await;
        self.event_bus
            .emit(MatchEvent::ScoreboardUpdated {
                match_id: match_id.to_string(),
                rows,
            })
            .await;

        Ok(delivery)
    }

    /// Removes a recorded delivery and rebuilds the snapshot.
    #[instrument(skip(self))]
    pub async fn remove_ball(
        &self,
        match_id: &str,
        delivery_id: &str,
    ) -> Result<(), ScoringError> {
        let match_lock = self.match_lock(match_id).await;
        let _guard = match_lock.lock().await;

        let fixture = self.require_match(match_id).await?;

        self.deliveries
            .get(delivery_id)
            .await?
            .filter(|d| d.match_id == match_id)
            .ok_or_else(|| ScoringError::DeliveryNotFound(delivery_id.to_string()))?;
        self.deliveries.delete(delivery_id).await?;

        info!(match_id = %match_id, delivery_id = %delivery_id, "Delivery deleted");

        let rows = self.refresh_scoreboard(&fixture).await?;

        self.event_bus
            .emit(MatchEvent::BallDeleted {
                match_id: match_id.to_string(),
                delivery_id: delivery_id.to_string(),
            })
            .await;
        self.event_bus
            .emit(MatchEvent::ScoreboardUpdated {
                match_id: match_id.to_string(),
                rows,
            })
            .await;

        Ok(())
    }

    /// The match's delivery log in game order.
    #[instrument(skip(self))]
    pub async fn deliveries(&self, match_id: &str) -> Result<Vec<Delivery>, ScoringError> {
        self.require_match(match_id).await?;
        self.deliveries.list_for_match(match_id).await
    }

    /// The live scoreboard: a replay of the delivery log, falling back to
    /// the persisted snapshot rows when nothing has been recorded (so a
    /// dashboard can always render something).
    #[instrument(skip(self))]
    pub async fn live_scoreboard(&self, match_id: &str) -> Result<LiveScoreboard, ScoringError> {
        let fixture = self.require_match(match_id).await?;
        let deliveries = self.deliveries.list_for_match(match_id).await?;

        if let Some(board) = aggregate_scoreboard(&deliveries, fixture.balls_per_innings()) {
            return Ok(board);
        }

        debug!(match_id = %match_id, "No deliveries recorded, serving snapshot scoreboard");
        let rows = self.scoreboards.rows_for_match(match_id).await?;
        let first = normalise_snapshot(rows.iter().find(|r| r.innings == 1));
        let second = normalise_snapshot(rows.iter().find(|r| r.innings == 2));

        let innings1 = InningsTotals {
            runs: first.runs,
            wickets: first.wickets,
            legal_balls: overs_to_balls(&first.overs),
        };
        let innings2 = InningsTotals {
            runs: second.runs,
            wickets: second.wickets,
            legal_balls: overs_to_balls(&second.overs),
        };
        let chase = chase_state(&innings1, &innings2, fixture.balls_per_innings());

        Ok(LiveScoreboard {
            innings1: innings1.into(),
            innings2: ChasingInnings {
                totals: innings2.into(),
                chase,
            },
        })
    }

    /// The full scorecard for a match.
    #[instrument(skip(self))]
    pub async fn scorecard(&self, match_id: &str) -> Result<Scorecard, ScoringError> {
        let fixture = self.require_match(match_id).await?;

        let team1 = self.team_ref(&fixture.team1_id, "Team 1").await?;
        let team2 = self.team_ref(&fixture.team2_id, "Team 2").await?;

        let players = self
            .teams
            .players_for_teams(&[fixture.team1_id.clone(), fixture.team2_id.clone()])
            .await?;
        let deliveries = self.deliveries.list_for_match(match_id).await?;

        let header = MatchHeader {
            id: fixture.id.clone(),
            venue: fixture.venue.clone(),
            status: fixture.status,
            match_date: fixture.match_date,
            team1,
            team2,
        };

        Ok(build_scorecard(
            header,
            fixture.winner_id.as_deref(),
            &deliveries,
            &players,
        ))
    }

    /// Recomputes and upserts the two snapshot rows from the full log.
    /// Idempotent: an unchanged log produces identical rows.
    #[instrument(skip(self, fixture))]
    pub async fn refresh_scoreboard(
        &self,
        fixture: &MatchModel,
    ) -> Result<Vec<ScoreboardRow>, ScoringError> {
        let deliveries = self.deliveries.list_for_match(&fixture.id).await?;

        let innings1 = aggregate_innings(&deliveries, 1);
        let innings2 = aggregate_innings(&deliveries, 2);
        let chase = chase_state(&innings1, &innings2, fixture.balls_per_innings());

        let rows = vec![
            snapshot_row(fixture, &fixture.team1_id, 1, &innings1, None),
            snapshot_row(
                fixture,
                &fixture.team2_id,
                2,
                &innings2,
                chase.required_run_rate,
            ),
        ];

        self.scoreboards.upsert(&rows).await?;
        debug!(match_id = %fixture.id, "Scoreboard snapshot refreshed");
        Ok(rows)
    }

    /// Seeds zeroed snapshot rows when a match starts, so dashboards show
    /// 0/0 instead of nothing.
    #[instrument(skip(self, fixture))]
    pub async fn seed_scoreboard(&self, fixture: &MatchModel) -> Result<(), ScoringError> {
        let zero = InningsTotals::default();
        let rows = vec![
            snapshot_row(fixture, &fixture.team1_id, 1, &zero, None),
            snapshot_row(fixture, &fixture.team2_id, 2, &zero, None),
        ];
        self.scoreboards.upsert(&rows).await?;
        info!(match_id = %fixture.id, "Scoreboard seeded");
        Ok(())
    }

    async fn team_ref(&self, team_id: &str, fallback: &str) -> Result<TeamRef, ScoringError> {
        let name = self
            .teams
            .get_team(team_id)
            .await?
            .map(|t| t.name)
            .unwrap_or_else(|| fallback.to_string());
        Ok(TeamRef {
            id: team_id.to_string(),
            name,
        })
    }

    async fn require_match(&self, match_id: &str) -> Result<MatchModel, ScoringError> {
        self.matches
            .get_match(match_id)
            .await?
            .ok_or_else(|| ScoringError::MatchNotFound(match_id.to_string()))
    }

    async fn match_lock(&self, match_id: &str) -> Arc<AsyncMutex<()>> {
        {
            let guard = self.match_locks.read().await;
            if let Some(lock) = guard.get(match_id) {
                return lock.clone();
            }
        }

        let mut guard = self.match_locks.write().await;
        guard
            .entry(match_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

fn snapshot_row(
    fixture: &MatchModel,
    team_id: &str,
    innings: u8,
    totals: &InningsTotals,
    required_rr: Option<f64>,
) -> ScoreboardRow {
    ScoreboardRow {
        match_id: fixture.id.clone(),
        team_id: team_id.to_string(),
        innings,
        runs: totals.runs,
        wickets: totals.wickets,
        overs: totals.overs(),
        current_rr: totals.run_rate(),
        required_rr,
        updated_at: Utc::now(),
    }
}

fn validate_ball_facts(
    runs: u32,
    extras: u32,
    has_extra_type: bool,
    has_wicket: bool,
    wicket_player_id: Option<&str>,
) -> Result<(), ScoringError> {
    if runs > 6 {
        return Err(ScoringError::Validation(
            "Runs must be between 0 and 6".to_string(),
        ));
    }
    if extras > 6 {
        return Err(ScoringError::Validation(
            "Extras must be between 0 and 6".to_string(),
        ));
    }
    if extras > 0 && !has_extra_type {
        return Err(ScoringError::Validation(
            "Extra type is required when extras are recorded".to_string(),
        ));
    }
    if extras == 0 && has_extra_type {
        return Err(ScoringError::Validation(
            "Extras must be greater than zero when an extra type is selected".to_string(),
        ));
    }
    if has_wicket && wicket_player_id.map_or(true, str::is_empty) {
        return Err(ScoringError::Validation(
            "Select the player dismissed for the chosen wicket type".to_string(),
        ));
    }
    Ok(())
}

/// Keeps the persisted snapshot in step with the match lifecycle: seeds
/// zero rows the moment a match starts.
pub struct ScoreboardSubscriber {
    scoring_service: Arc<ScoringService>,
    matches: Arc<dyn MatchRepository>,
}

impl ScoreboardSubscriber {
    pub fn new(scoring_service: Arc<ScoringService>, matches: Arc<dyn MatchRepository>) -> Self {
        Self {
            scoring_service,
            matches,
        }
    }
}

#[async_trait]
impl MatchEventHandler for ScoreboardSubscriber {
    async fn handle(&self, event: &MatchEvent) -> Result<(), EventError> {
        if let MatchEvent::StatusChanged {
            match_id,
            status: MatchStatus::Ongoing,
        } = event
        {
            let fixture = self
                .matches
                .get_match(match_id)
                .await
                .map_err(|e| EventError::retryable(e.to_string()))?
                .ok_or_else(|| EventError::non_retryable(format!("Match not found: {match_id}")))?;

            self.scoring_service
                .seed_scoreboard(&fixture)
                .await
                .map_err(|e| EventError::retryable(e.to_string()))?;
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "ScoreboardSubscriber"
    }
}
