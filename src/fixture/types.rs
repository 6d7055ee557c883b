use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::models::{ElectedTo, MatchStatus};

/// Request payload for scheduling a new match
#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    pub team1_id: String,
    pub team2_id: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub match_date: Option<DateTime<Utc>>,
    pub overs_per_innings: u32,
}

/// Request payload for starting an upcoming match
#[derive(Debug, Deserialize)]
pub struct StartMatchRequest {
    #[serde(default)]
    pub toss_winner_id: Option<String>,
    #[serde(default)]
    pub elected_to: Option<ElectedTo>,
    #[serde(default)]
    pub overs_per_innings: Option<u32>,
}

/// Request payload for a status transition
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: MatchStatus,
    #[serde(default)]
    pub winner_id: Option<String>,
}
