use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tournament team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamModel {
    pub id: String,
    pub name: String,
    pub captain: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TeamModel {
    pub fn new(name: String, captain: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            captain,
            created_at: Utc::now(),
        }
    }
}

/// A squad member belonging to exactly one team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerModel {
    pub id: String,
    pub team_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl PlayerModel {
    pub fn new(team_id: String, name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            team_id,
            name,
            created_at: Utc::now(),
        }
    }
}
