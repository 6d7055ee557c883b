use serde::Serialize;

use super::models::{Delivery, ExtraType};
use super::overs::{balls_to_overs, round2, run_rate};

/// Cumulative totals for one innings, folded from the delivery log.
///
/// Deliberately recomputed from scratch on every read: a pure reducer over the
/// event log cannot drift from it the way incrementally patched counters can.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InningsTotals {
    pub runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
}

impl InningsTotals {
    /// Folds one delivery into the running totals.
    pub fn fold(&mut self, delivery: &Delivery) {
        self.runs += delivery.team_runs();
        if delivery.wicket_type.is_some() {
            self.wickets += 1;
        }
        if delivery.is_legal() {
            self.legal_balls += 1;
        }
    }

    pub fn overs(&self) -> String {
        balls_to_overs(self.legal_balls)
    }

    pub fn run_rate(&self) -> f64 {
        round2(run_rate(self.runs, self.legal_balls))
    }
}

/// Display shape of an innings aggregate as served to consumers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InningsSummary {
    pub runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
    pub overs: String,
    pub run_rate: f64,
}

impl From<InningsTotals> for InningsSummary {
    fn from(totals: InningsTotals) -> Self {
        Self {
            runs: totals.runs,
            wickets: totals.wickets,
            legal_balls: totals.legal_balls,
            overs: totals.overs(),
            run_rate: totals.run_rate(),
        }
    }
}

/// Folds the deliveries belonging to `innings` into cumulative totals.
///
/// Arrival order is irrelevant here: addition commutes, so the same log always
/// produces the same totals no matter how corrections reordered it.
pub fn aggregate_innings(deliveries: &[Delivery], innings: u8) -> InningsTotals {
    let mut totals = InningsTotals::default();
    for delivery in deliveries.iter().filter(|d| d.innings == innings) {
        totals.fold(delivery);
    }
    totals
}

/// The (over, ball) slot a newly recorded delivery should occupy, given the
/// latest recorded delivery of the innings (maximum by over then ball).
///
/// A legal last ball advances the counter, rolling into a fresh over after
/// ball 6. An illegal last ball (wide or no-ball) must be re-bowled, so the
/// new delivery repeats the same slot.
pub fn next_ball_slot(last: Option<&Delivery>) -> (u32, u32) {
    match last {
        None => (1, 1),
        Some(previous) => {
            if previous.is_legal() {
                if previous.ball_number >= 6 {
                    (previous.over_number + 1, 1)
                } else {
                    (previous.over_number, previous.ball_number + 1)
                }
            } else {
                (previous.over_number, previous.ball_number)
            }
        }
    }
}

/// Whether the next delivery is a free hit: true exactly when the
/// chronologically preceding delivery of the innings was a no-ball.
pub fn free_hit_follows(previous: Option<&Delivery>) -> bool {
    matches!(
        previous.and_then(|d| d.extra_type),
        Some(ExtraType::NoBall)
    )
}
