use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle state of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchStatus {
    Upcoming,
    Ongoing,
    Completed,
    Abandoned,
}

/// What the toss winner chose to do first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ElectedTo {
    Bat,
    Bowl,
}

/// A scheduled or played match between two teams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchModel {
    pub id: String,
    pub team1_id: String,
    pub team2_id: String,
    pub venue: Option<String>,
    pub match_date: Option<DateTime<Utc>>,
    pub status: MatchStatus,
    /// Set only when the match has completed.
    pub winner_id: Option<String>,
    pub toss_winner_id: Option<String>,
    pub elected_to: Option<ElectedTo>,
    /// Format length; 20 for a T20.
    pub overs_per_innings: u32,
    pub created_at: DateTime<Utc>,
}

impl MatchModel {
    pub fn new(
        team1_id: String,
        team2_id: String,
        venue: Option<String>,
        match_date: Option<DateTime<Utc>>,
        overs_per_innings: u32,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            team1_id,
            team2_id,
            venue,
            match_date,
            status: MatchStatus::Upcoming,
            winner_id: None,
            toss_winner_id: None,
            elected_to: None,
            overs_per_innings,
            created_at: Utc::now(),
        }
    }

    pub fn balls_per_innings(&self) -> u32 {
        self.overs_per_innings * 6
    }

    /// Team 1 bats the first innings, team 2 the second.
    pub fn batting_team_id(&self, innings: u8) -> &str {
        if innings == 1 {
            &self.team1_id
        } else {
            &self.team2_id
        }
    }

    pub fn bowling_team_id(&self, innings: u8) -> &str {
        if innings == 1 {
            &self.team2_id
        } else {
            &self.team1_id
        }
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.team1_id == team_id || self.team2_id == team_id
    }
}
