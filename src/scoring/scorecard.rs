use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::models::{Delivery, ExtraType, WicketType};
use super::overs::{balls_to_overs, run_rate};
use crate::fixture::models::MatchStatus;
use crate::team::models::PlayerModel;

/// Team identity as displayed on a scorecard.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TeamRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BattingRow {
    pub player_id: String,
    pub name: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: String,
    pub dismissal: String,
    pub is_not_out: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BowlingRow {
    pub player_id: String,
    pub name: String,
    pub overs: String,
    pub runs: u32,
    pub wickets: u32,
    pub economy: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ExtrasBreakdown {
    pub wides: u32,
    pub no_balls: u32,
    pub byes: u32,
    pub leg_byes: u32,
    pub others: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FallOfWicket {
    pub wicket: u32,
    /// Score at the fall, "runs/wickets".
    pub score: String,
    /// Over and ball of the dismissal, "o.b".
    pub over: String,
    pub player: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InningsTotalLine {
    pub runs: u32,
    pub wickets: u32,
    pub overs: String,
    pub run_rate: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InningsScorecard {
    pub innings: u8,
    pub batting_team: TeamRef,
    pub bowling_team: TeamRef,
    pub batting: Vec<BattingRow>,
    pub did_not_bat: Vec<String>,
    pub fall_of_wickets: Vec<FallOfWicket>,
    pub bowling: Vec<BowlingRow>,
    pub extras: ExtrasBreakdown,
    pub total: InningsTotalLine,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchOutcome {
    pub winner_id: Option<String>,
    pub winner_name: Option<String>,
    pub margin: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchHeader {
    pub id: String,
    pub venue: Option<String>,
    pub status: MatchStatus,
    pub match_date: Option<DateTime<Utc>>,
    pub team1: TeamRef,
    pub team2: TeamRef,
}

/// The full derived report for a match: both innings plus the result line.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Scorecard {
    #[serde(rename = "match")]
    pub header: MatchHeader,
    pub innings: Vec<InningsScorecard>,
    pub result: Option<MatchOutcome>,
}

#[derive(Debug, Default)]
struct BatterAcc {
    name: String,
    runs: u32,
    balls: u32,
    fours: u32,
    sixes: u32,
    dismissal: String,
    is_out: bool,
}

#[derive(Debug, Default)]
struct BowlerAcc {
    name: String,
    runs: u32,
    legal_balls: u32,
    wickets: u32,
}

fn format_rate(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "0.00".to_string()
    }
}

fn player_name(players: &HashMap<&str, &str>, player_id: &str) -> String {
    players
        .get(player_id)
        .map_or_else(|| "Unknown".to_string(), |name| (*name).to_string())
}

fn dismissal_text(wicket_type: WicketType, bowler_name: &str) -> String {
    match wicket_type {
        WicketType::Bowled => format!("b {bowler_name}"),
        WicketType::Lbw => format!("lbw b {bowler_name}"),
        // Fielder identity is not part of the delivery record.
        WicketType::Caught => format!("c ? b {bowler_name}"),
        WicketType::Stumped => format!("stumped b {bowler_name}"),
        WicketType::HitWicket => "hit wicket".to_string(),
        WicketType::RunOut => "run out".to_string(),
    }
}

/// Builds the scorecard for one innings from the full delivery log.
///
/// Deliveries are replayed in (over, ball) order rather than creation order,
/// so corrections recorded out of sequence still render in game order.
pub fn build_innings_scorecard(
    innings: u8,
    deliveries: &[Delivery],
    batting_team: &TeamRef,
    bowling_team: &TeamRef,
    players: &[PlayerModel],
) -> InningsScorecard {
    let names: HashMap<&str, &str> = players
        .iter()
        .map(|p| (p.id.as_str(), p.name.as_str()))
        .collect();

    let mut sorted: Vec<&Delivery> = deliveries.iter().filter(|d| d.innings == innings).collect();
    sorted.sort_by_key(|d| (d.over_number, d.ball_number));

    let mut batters: HashMap<String, BatterAcc> = HashMap::new();
    let mut batting_order: Vec<String> = Vec::new();
    let mut bowlers: HashMap<String, BowlerAcc> = HashMap::new();
    let mut bowling_order: Vec<String> = Vec::new();
    let mut fall_of_wickets: Vec<FallOfWicket> = Vec::new();
    let mut extras = ExtrasBreakdown::default();

    let mut total_runs = 0u32;
    let mut wicket_count = 0u32;
    let mut legal_balls = 0u32;

    for ball in &sorted {
        let is_legal = ball.is_legal();
        total_runs += ball.team_runs();
        if is_legal {
            legal_balls += 1;
        }

        let batter = batters
            .entry(ball.batsman_id.clone())
            .or_insert_with(|| {
                batting_order.push(ball.batsman_id.clone());
                BatterAcc {
                    name: player_name(&names, &ball.batsman_id),
                    dismissal: "not out".to_string(),
                    ..BatterAcc::default()
                }
            });
        batter.runs += ball.runs;
        if is_legal {
            batter.balls += 1;
        }
        if ball.extra_type.is_none() && ball.runs == 4 {
            batter.fours += 1;
        }
        if ball.extra_type.is_none() && ball.runs == 6 {
            batter.sixes += 1;
        }

        if ball.extras > 0 {
            extras.total += ball.extras;
            match ball.extra_type {
                Some(ExtraType::Wide) => extras.wides += ball.extras,
                Some(ExtraType::NoBall) => extras.no_balls += ball.extras,
                Some(ExtraType::Bye) => extras.byes += ball.extras,
                Some(ExtraType::LegBye) => extras.leg_byes += ball.extras,
                // Extras with no recorded type still count for the team.
                None => extras.others += ball.extras,
            }
        }

        let bowler = bowlers
            .entry(ball.bowler_id.clone())
            .or_insert_with(|| {
                bowling_order.push(ball.bowler_id.clone());
                BowlerAcc {
                    name: player_name(&names, &ball.bowler_id),
                    ..BowlerAcc::default()
                }
            });
        // Byes and leg-byes are debited to the team, not the bowler.
        let extras_for_bowler = match ball.extra_type {
            Some(ExtraType::Bye) | Some(ExtraType::LegBye) => 0,
            _ => ball.extras,
        };
        bowler.runs += ball.runs + extras_for_bowler;
        if is_legal {
            bowler.legal_balls += 1;
        }
        if let (Some(wicket_type), Some(_)) = (ball.wicket_type, &ball.wicket_player_id) {
            if wicket_type != WicketType::RunOut {
                bowler.wickets += 1;
            }
        }

        // A wicket without a dismissed-player id is tolerated but contributes
        // no fall-of-wicket entry.
        if let (Some(wicket_type), Some(dismissed_id)) = (ball.wicket_type, &ball.wicket_player_id)
        {
            wicket_count += 1;
            let bowler_name = player_name(&names, &ball.bowler_id);
            let dismissal = dismissal_text(wicket_type, &bowler_name);
            let dismissed_name = player_name(&names, dismissed_id);

            let dismissed = batters.entry(dismissed_id.clone()).or_insert_with(|| {
                // Dismissed without facing a ball (e.g. run out at the
                // non-striker's end): create the batting row now.
                batting_order.push(dismissed_id.clone());
                BatterAcc {
                    name: dismissed_name.clone(),
                    ..BatterAcc::default()
                }
            });
            dismissed.dismissal = dismissal;
            dismissed.is_out = true;

            fall_of_wickets.push(FallOfWicket {
                wicket: wicket_count,
                score: format!("{total_runs}/{wicket_count}"),
                over: format!("{}.{}", ball.over_number, ball.ball_number),
                player: dismissed_name,
            });
        }
    }

    let batting: Vec<BattingRow> = batting_order
        .iter()
        .map(|player_id| {
            let acc = &batters[player_id];
            let strike_rate = if acc.balls > 0 {
                format_rate(f64::from(acc.runs) * 100.0 / f64::from(acc.balls))
            } else {
                "0.00".to_string()
            };
            BattingRow {
                player_id: player_id.clone(),
                name: acc.name.clone(),
                runs: acc.runs,
                balls: acc.balls,
                fours: acc.fours,
                sixes: acc.sixes,
                strike_rate,
                dismissal: if acc.is_out {
                    acc.dismissal.clone()
                } else {
                    "not out".to_string()
                },
                is_not_out: !acc.is_out,
            }
        })
        .collect();

    let did_not_bat: Vec<String> = players
        .iter()
        .filter(|p| p.team_id == batting_team.id && !batters.contains_key(&p.id))
        .map(|p| p.name.clone())
        .collect();

    let mut bowling: Vec<(BowlingRow, f64)> = bowling_order
        .iter()
        .map(|player_id| {
            let acc = &bowlers[player_id];
            let economy = run_rate(acc.runs, acc.legal_balls);
            let row = BowlingRow {
                player_id: player_id.clone(),
                name: acc.name.clone(),
                overs: balls_to_overs(acc.legal_balls),
                runs: acc.runs,
                wickets: acc.wickets,
                economy: format_rate(economy),
            };
            (row, economy)
        })
        .collect();
    bowling.sort_by(|(a, a_econ), (b, b_econ)| {
        b.wickets
            .cmp(&a.wickets)
            .then(a_econ.total_cmp(b_econ))
            .then(a.runs.cmp(&b.runs))
    });
    let bowling: Vec<BowlingRow> = bowling.into_iter().map(|(row, _)| row).collect();

    InningsScorecard {
        innings,
        batting_team: batting_team.clone(),
        bowling_team: bowling_team.clone(),
        batting,
        did_not_bat,
        fall_of_wickets,
        bowling,
        extras,
        total: InningsTotalLine {
            runs: total_runs,
            wickets: wicket_count,
            overs: balls_to_overs(legal_balls),
            run_rate: format_rate(run_rate(total_runs, legal_balls)),
        },
    }
}

/// Resolves the match result once a match has completed.
///
/// An explicitly recorded winner is trusted over the run comparison; the
/// margin always follows the runs. Returns None for any other status.
pub fn match_result(
    status: MatchStatus,
    recorded_winner: Option<&str>,
    first: &InningsScorecard,
    second: &InningsScorecard,
) -> Option<MatchOutcome> {
    if status != MatchStatus::Completed {
        return None;
    }

    let team1_runs = first.total.runs;
    let team2_runs = second.total.runs;

    let winner_id = recorded_winner.map(str::to_string).or_else(|| {
        if team1_runs > team2_runs {
            Some(first.batting_team.id.clone())
        } else if team2_runs > team1_runs {
            Some(second.batting_team.id.clone())
        } else {
            None
        }
    });

    let winner_name = winner_id.as_deref().and_then(|id| {
        if id == first.batting_team.id {
            Some(first.batting_team.name.clone())
        } else if id == second.batting_team.id {
            Some(second.batting_team.name.clone())
        } else {
            None
        }
    });

    let margin = if team1_runs > team2_runs {
        let runs = team1_runs - team2_runs;
        Some(format!("{} run{}", runs, if runs == 1 { "" } else { "s" }))
    } else if team2_runs > team1_runs {
        let wickets_in_hand = (10u32.saturating_sub(second.total.wickets)).max(1);
        Some(format!(
            "{} wicket{}",
            wickets_in_hand,
            if wickets_in_hand == 1 { "" } else { "s" }
        ))
    } else if team1_runs > 0 || team2_runs > 0 {
        Some("Match tied".to_string())
    } else {
        None
    };

    Some(MatchOutcome {
        winner_id,
        winner_name,
        margin,
    })
}

/// Builds the full scorecard for a match: both innings, in batting order
/// (team 1 bats the first innings), plus the result line.
pub fn build_scorecard(
    header: MatchHeader,
    recorded_winner: Option<&str>,
    deliveries: &[Delivery],
    players: &[PlayerModel],
) -> Scorecard {
    let first = build_innings_scorecard(1, deliveries, &header.team1, &header.team2, players);
    let second = build_innings_scorecard(2, deliveries, &header.team2, &header.team1, players);
    let result = match_result(header.status, recorded_winner, &first, &second);

    Scorecard {
        header,
        innings: vec![first, second],
        result,
    }
}
