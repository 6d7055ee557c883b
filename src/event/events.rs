use serde::{Deserialize, Serialize};

use crate::fixture::models::MatchStatus;
use crate::scoring::models::{Delivery, ScoreboardRow};
use crate::standings::models::Standing;

/// Events that can occur while a tournament is being scored
///
/// Events represent facts about things that have already happened.
/// They are the change-notification stream the derived views react to:
/// every handler re-reads the relevant log and recomputes from scratch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MatchEvent {
    /// A delivery was appended to a match's event log
    BallRecorded {
        match_id: String,
        delivery: Delivery,
    },

    /// An already-recorded delivery was edited as a correction
    BallCorrected {
        match_id: String,
        delivery: Delivery,
    },

    /// A recorded delivery was removed
    BallDeleted {
        match_id: String,
        delivery_id: String,
    },

    /// A match moved through its lifecycle (started, completed, abandoned)
    StatusChanged {
        match_id: String,
        status: MatchStatus,
    },

    /// The scoreboard snapshot rows for a match were recomputed
    ScoreboardUpdated {
        match_id: String,
        rows: Vec<ScoreboardRow>,
    },

    /// The tournament table was recomputed after a match completed
    StandingsUpdated {
        match_id: String,
        standings: Vec<Standing>,
    },
}

impl MatchEvent {
    /// Get the match id associated with this event
    /// All events are match-specific in this system
    pub fn match_id(&self) -> &str {
        match self {
            MatchEvent::BallRecorded { match_id, .. } => match_id,
            MatchEvent::BallCorrected { match_id, .. } => match_id,
            MatchEvent::BallDeleted { match_id, .. } => match_id,
            MatchEvent::StatusChanged { match_id, .. } => match_id,
            MatchEvent::ScoreboardUpdated { match_id, .. } => match_id,
            MatchEvent::StandingsUpdated { match_id, .. } => match_id,
        }
    }

    /// Get a human-readable description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            MatchEvent::BallRecorded { .. } => "ball_recorded",
            MatchEvent::BallCorrected { .. } => "ball_corrected",
            MatchEvent::BallDeleted { .. } => "ball_deleted",
            MatchEvent::StatusChanged { .. } => "status_changed",
            MatchEvent::ScoreboardUpdated { .. } => "scoreboard_updated",
            MatchEvent::StandingsUpdated { .. } => "standings_updated",
        }
    }
}
