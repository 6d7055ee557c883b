use axum::{extract::State, Json};
use tracing::instrument;

use super::models::Standing;
use crate::shared::{AppError, AppState};

/// HTTP handler for the tournament table
///
/// GET /standings
#[instrument(name = "standings", skip(state))]
pub async fn standings(State(state): State<AppState>) -> Result<Json<Vec<Standing>>, AppError> {
    let table = state.standings_service.standings().await?;
    Ok(Json(table))
}
