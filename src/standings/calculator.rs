use std::collections::HashMap;

use super::models::Standing;
use crate::fixture::models::{MatchModel, MatchStatus};
use crate::scoring::models::ScoreboardRow;
use crate::scoring::overs::{balls_to_overs, overs_to_balls, round3, run_rate};

#[derive(Debug, Default)]
struct TeamTally {
    matches_played: u32,
    wins: u32,
    ties: u32,
    runs_for: u32,
    runs_against: u32,
    overs_faced_balls: u32,
    overs_bowled_balls: u32,
}

impl TeamTally {
    fn absorb(&mut self, team_row: &ScoreboardRow, opponent_row: &ScoreboardRow, winner_id: Option<&str>, team_id: &str) {
        self.matches_played += 1;
        self.runs_for += team_row.runs;
        self.runs_against += opponent_row.runs;
        self.overs_faced_balls += overs_to_balls(&team_row.overs);
        self.overs_bowled_balls += overs_to_balls(&opponent_row.overs);

        if team_row.runs == opponent_row.runs {
            self.ties += 1;
        } else if let Some(winner) = winner_id {
            if winner == team_id {
                self.wins += 1;
            }
        } else if team_row.runs > opponent_row.runs {
            self.wins += 1;
        }
    }
}

/// Derives the tournament table from completed matches and their final
/// innings totals.
///
/// A match only counts when both sides have a totals row; partial data
/// contributes nothing rather than a guessed value. Ties go by equal runs;
/// otherwise an explicitly recorded winner takes precedence over the run
/// comparison. Output is ranked by points, then net run rate.
pub fn compute_standings(
    matches: &[MatchModel],
    scoreboards: &[ScoreboardRow],
    team_names: &HashMap<String, String>,
) -> Vec<Standing> {
    let mut tallies: HashMap<String, TeamTally> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for fixture in matches.iter().filter(|m| m.status == MatchStatus::Completed) {
        let rows: Vec<&ScoreboardRow> = scoreboards
            .iter()
            .filter(|r| r.match_id == fixture.id)
            .collect();

        for team_id in [&fixture.team1_id, &fixture.team2_id] {
            if !tallies.contains_key(team_id.as_str()) {
                tallies.insert(team_id.clone(), TeamTally::default());
                order.push(team_id.clone());
            }

            let team_row = rows.iter().find(|r| &r.team_id == team_id);
            let opponent_row = rows.iter().find(|r| &r.team_id != team_id);

            if let (Some(team_row), Some(opponent_row)) = (team_row, opponent_row) {
                tallies.get_mut(team_id.as_str()).unwrap().absorb(
                    team_row,
                    opponent_row,
                    fixture.winner_id.as_deref(),
                    team_id,
                );
            }
        }
    }

    let mut standings: Vec<Standing> = order
        .into_iter()
        .map(|team_id| {
            let tally = &tallies[&team_id];
            let losses = tally
                .matches_played
                .saturating_sub(tally.wins + tally.ties);
            let rate_for = run_rate(tally.runs_for, tally.overs_faced_balls);
            let rate_against = run_rate(tally.runs_against, tally.overs_bowled_balls);

            Standing {
                team_name: team_names
                    .get(&team_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown Team".to_string()),
                team_id,
                matches_played: tally.matches_played,
                wins: tally.wins,
                losses,
                ties: tally.ties,
                points: tally.wins * 2 + tally.ties,
                runs_for: tally.runs_for,
                runs_against: tally.runs_against,
                overs_faced: balls_to_overs(tally.overs_faced_balls),
                overs_bowled: balls_to_overs(tally.overs_bowled_balls),
                nrr: round3(rate_for - rate_against),
            }
        })
        .collect();

    standings.sort_by(|a, b| b.points.cmp(&a.points).then(b.nrr.total_cmp(&a.nrr)));
    standings
}
