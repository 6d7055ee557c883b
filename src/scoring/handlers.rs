use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use super::{
    models::Delivery,
    scoreboard::LiveScoreboard,
    scorecard::Scorecard,
    types::{AmendBallRequest, RecordBallRequest},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for recording a delivery
///
/// POST /matches/:match_id/balls
#[instrument(name = "record_ball", skip(state, request))]
pub async fn record_ball(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<RecordBallRequest>,
) -> Result<(StatusCode, Json<Delivery>), AppError> {
    let delivery = state.scoring_service.record_ball(&match_id, request).await?;
    Ok((StatusCode::CREATED, Json(delivery)))
}

/// HTTP handler for listing a match's deliveries in game order
///
/// GET /matches/:match_id/balls
#[instrument(name = "list_balls", skip(state))]
pub async fn list_balls(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Vec<Delivery>>, AppError> {
    let deliveries = state.scoring_service.deliveries(&match_id).await?;
    Ok(Json(deliveries))
}

/// HTTP handler for correcting a recorded delivery
///
/// PUT /matches/:match_id/balls/:ball_id
#[instrument(name = "amend_ball", skip(state, request))]
pub async fn amend_ball(
    State(state): State<AppState>,
    Path((match_id, ball_id)): Path<(String, String)>,
    Json(request): Json<AmendBallRequest>,
) -> Result<Json<Delivery>, AppError> {
    let delivery = state
        .scoring_service
        .amend_ball(&match_id, &ball_id, request)
        .await?;
    Ok(Json(delivery))
}

/// HTTP handler for deleting a recorded delivery
///
/// DELETE /matches/:match_id/balls/:ball_id
#[instrument(name = "remove_ball", skip(state))]
pub async fn remove_ball(
    State(state): State<AppState>,
    Path((match_id, ball_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state.scoring_service.remove_ball(&match_id, &ball_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// HTTP handler for the live scoreboard
///
/// GET /matches/:match_id/scoreboard
#[instrument(name = "live_scoreboard", skip(state))]
pub async fn live_scoreboard(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<LiveScoreboard>, AppError> {
    let board = state.scoring_service.live_scoreboard(&match_id).await?;
    Ok(Json(board))
}

/// HTTP handler for the full match scorecard
///
/// GET /matches/:match_id/scorecard
#[instrument(name = "scorecard", skip(state))]
pub async fn scorecard(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Scorecard>, AppError> {
    let card = state.scoring_service.scorecard(&match_id).await?;
    Ok(Json(card))
}
