use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Classification of extra runs conceded on a delivery.
///
/// Wides and no-balls do not consume a legal ball; byes and leg-byes do, and
/// are scored against the team rather than the bowler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ExtraType {
    Wide,
    NoBall,
    Bye,
    LegBye,
}

/// How a batsman was dismissed. Run-outs are the one mode not credited to
/// the bowler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WicketType {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
}

/// A single ball of a match: the immutable fact recorded by the scoring
/// operator. Corrections edit or delete the row; every derived figure is
/// recomputed from the full log, so the log is the only source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub id: String,
    pub match_id: String,
    /// 1 or 2.
    pub innings: u8,
    /// 1-based over within the innings.
    pub over_number: u32,
    /// 1-based ball slot within the over; wides and no-balls repeat the slot.
    pub ball_number: u32,
    pub batsman_id: String,
    pub bowler_id: String,
    /// Runs off the bat, 0-6.
    pub runs: u32,
    /// Extra runs, 0-6. Nonzero iff `extra_type` is set.
    pub extras: u32,
    pub extra_type: Option<ExtraType>,
    pub wicket_type: Option<WicketType>,
    pub wicket_player_id: Option<String>,
    pub is_free_hit: bool,
    pub created_at: DateTime<Utc>,
}

impl Delivery {
    /// Whether this delivery counts toward the 6-ball-per-over quota.
    pub fn is_legal(&self) -> bool {
        !matches!(
            self.extra_type,
            Some(ExtraType::Wide) | Some(ExtraType::NoBall)
        )
    }

    /// Total runs this delivery added to the batting side.
    pub fn team_runs(&self) -> u32 {
        self.runs + self.extras
    }
}

/// Persisted scoreboard snapshot for one innings of one match.
///
/// A cache of the live aggregate, upserted after every recorded ball so
/// consumers that cannot replay the delivery log still have figures to show.
/// Recomputing it from an unchanged log always yields the identical row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreboardRow {
    pub match_id: String,
    pub team_id: String,
    pub innings: u8,
    pub runs: u32,
    pub wickets: u32,
    /// Overs display form, e.g. "12.4".
    pub overs: String,
    pub current_rr: f64,
    pub required_rr: Option<f64>,
    pub updated_at: DateTime<Utc>,
}
