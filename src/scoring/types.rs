use serde::Deserialize;

use super::models::{ExtraType, WicketType};

/// Request payload for recording a delivery
///
/// Over/ball position and the free-hit flag are assigned server-side from
/// the innings' existing log, never trusted from the client.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordBallRequest {
    pub innings: u8,
    pub batsman_id: String,
    pub bowler_id: String,
    pub runs: u32,
    #[serde(default)]
    pub extras: u32,
    #[serde(default)]
    pub extra_type: Option<ExtraType>,
    #[serde(default)]
    pub wicket_type: Option<WicketType>,
    #[serde(default)]
    pub wicket_player_id: Option<String>,
}

/// Request payload for correcting an already-recorded delivery.
/// The over/ball slot is kept; only the recorded facts change.
#[derive(Debug, Clone, Deserialize)]
pub struct AmendBallRequest {
    pub runs: u32,
    #[serde(default)]
    pub extras: u32,
    #[serde(default)]
    pub extra_type: Option<ExtraType>,
    #[serde(default)]
    pub wicket_type: Option<WicketType>,
    #[serde(default)]
    pub wicket_player_id: Option<String>,
}
