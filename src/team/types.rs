use serde::Deserialize;

/// Request payload for registering a team
#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    #[serde(default)]
    pub captain: Option<String>,
}

/// Request payload for adding a player to a team's roster
#[derive(Debug, Deserialize)]
pub struct AddPlayerRequest {
    pub name: String,
}
