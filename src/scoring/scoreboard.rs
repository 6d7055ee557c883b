use serde::Serialize;

use super::innings::{aggregate_innings, InningsSummary, InningsTotals};
use super::models::{Delivery, ScoreboardRow};
use super::overs::{round2, run_rate};

/// Chase-state figures for the second innings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChaseState {
    /// Set once the first innings has scored: innings-1 runs + 1.
    pub target: Option<u32>,
    pub runs_needed: Option<u32>,
    pub balls_remaining: Option<u32>,
    /// None both before a target exists and when the chase is mathematically
    /// dead (runs still needed, no legal balls left) - consumers render "N/A".
    pub required_run_rate: Option<f64>,
}

/// The in-progress view of a match: both innings plus chase state.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LiveScoreboard {
    pub innings1: InningsSummary,
    pub innings2: ChasingInnings,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChasingInnings {
    #[serde(flatten)]
    pub totals: InningsSummary,
    #[serde(flatten)]
    pub chase: ChaseState,
}

/// Normalized shape of a persisted scoreboard row, used when the delivery
/// log is unavailable and the snapshot is all there is to show.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SnapshotSummary {
    pub runs: u32,
    pub wickets: u32,
    pub overs: String,
    pub run_rate: f64,
    pub required_run_rate: Option<f64>,
}

/// Derives the chase figures from both innings' totals.
pub fn chase_state(
    innings1: &InningsTotals,
    innings2: &InningsTotals,
    balls_per_innings: u32,
) -> ChaseState {
    if innings1.runs == 0 {
        // No target until the first innings has scored.
        return ChaseState {
            target: None,
            runs_needed: None,
            balls_remaining: None,
            required_run_rate: None,
        };
    }

    let target = innings1.runs + 1;
    let runs_needed = target.saturating_sub(innings2.runs);
    let balls_remaining = balls_per_innings.saturating_sub(innings2.legal_balls);

    let required_run_rate = if runs_needed == 0 {
        Some(0.0)
    } else if balls_remaining > 0 {
        Some(round2(run_rate(runs_needed, balls_remaining)))
    } else {
        None
    };

    ChaseState {
        target: Some(target),
        runs_needed: Some(runs_needed),
        balls_remaining: Some(balls_remaining),
        required_run_rate,
    }
}

/// Replays the full delivery log into a live scoreboard.
///
/// Returns None when nothing has been bowled yet; callers fall back to the
/// persisted snapshot (or a zeroed display) in that case.
pub fn aggregate_scoreboard(
    deliveries: &[Delivery],
    balls_per_innings: u32,
) -> Option<LiveScoreboard> {
    if deliveries.is_empty() {
        return None;
    }

    let innings1 = aggregate_innings(deliveries, 1);
    let innings2 = aggregate_innings(deliveries, 2);
    let chase = chase_state(&innings1, &innings2, balls_per_innings);

    Some(LiveScoreboard {
        innings1: innings1.into(),
        innings2: ChasingInnings {
            totals: innings2.into(),
            chase,
        },
    })
}

/// Normalizes an optional persisted snapshot row into display figures,
/// coercing an absent row to a zeroed scoreboard rather than an error.
pub fn normalise_snapshot(row: Option<&ScoreboardRow>) -> SnapshotSummary {
    match row {
        Some(row) => SnapshotSummary {
            runs: row.runs,
            wickets: row.wickets,
            overs: row.overs.clone(),
            run_rate: row.current_rr,
            required_run_rate: row.required_rr,
        },
        None => SnapshotSummary {
            runs: 0,
            wickets: 0,
            overs: "0.0".to_string(),
            run_rate: 0.0,
            required_run_rate: None,
        },
    }
}
