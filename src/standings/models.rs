use serde::{Deserialize, Serialize};

/// One team's row in the tournament table, derived from every completed
/// match the team played. Recomputed whole from the match results; never
/// incrementally patched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Standing {
    pub team_id: String,
    pub team_name: String,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    /// wins x 2 + ties.
    pub points: u32,
    pub runs_for: u32,
    pub runs_against: u32,
    /// Overs display form, e.g. "38.4".
    pub overs_faced: String,
    pub overs_bowled: String,
    /// Net run rate: run rate scored minus run rate conceded, 3 decimals.
    pub nrr: f64,
}
