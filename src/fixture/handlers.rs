use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use super::{
    models::MatchModel,
    types::{CreateMatchRequest, StartMatchRequest, UpdateStatusRequest},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for scheduling a new match
///
/// POST /matches
#[instrument(name = "create_match", skip(state, request))]
pub async fn create_match(
    State(state): State<AppState>,
    Json(request): Json<CreateMatchRequest>,
) -> Result<(StatusCode, Json<MatchModel>), AppError> {
    let fixture = state.match_service.create_match(request).await?;
    Ok((StatusCode::CREATED, Json(fixture)))
}

/// HTTP handler for listing all matches
///
/// GET /matches
#[instrument(name = "list_matches", skip(state))]
pub async fn list_matches(
    State(state): State<AppState>,
) -> Result<Json<Vec<MatchModel>>, AppError> {
    let matches = state.match_service.list_matches().await?;
    Ok(Json(matches))
}

/// HTTP handler for fetching one match
///
/// GET /matches/:match_id
#[instrument(name = "get_match", skip(state))]
pub async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchModel>, AppError> {
    let fixture = state
        .match_service
        .get_match(&match_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Match not found".to_string()))?;
    Ok(Json(fixture))
}

/// HTTP handler for starting an upcoming match (records the toss)
///
/// POST /matches/:match_id/start
#[instrument(name = "start_match", skip(state, request))]
pub async fn start_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<StartMatchRequest>,
) -> Result<Json<MatchModel>, AppError> {
    let fixture = state.match_service.start_match(&match_id, request).await?;
    Ok(Json(fixture))
}

/// HTTP handler for a match status transition
///
/// POST /matches/:match_id/status
#[instrument(name = "update_status", skip(state, request))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<MatchModel>, AppError> {
    let fixture = state.match_service.set_status(&match_id, request).await?;
    Ok(Json(fixture))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::models::MatchStatus;
    use crate::shared::test_utils::build_app_state;
    use crate::team::models::TeamModel;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::post,
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn app() -> Router {
        Router::new()
            .route("/teams", post(crate::team::handlers::create_team))
            .route("/matches", post(create_match).get(list_matches))
            .route("/matches/:match_id/start", post(start_match))
            .route("/matches/:match_id/status", post(update_status))
            .with_state(build_app_state())
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn create_team(app: &Router, name: &str) -> TeamModel {
        let response = app
            .clone()
            .oneshot(post_json("/teams", format!(r#"{{"name": "{name}"}}"#)))
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn schedules_and_starts_a_match() {
        let app = app();
        let team_a = create_team(&app, "Alphas").await;
        let team_b = create_team(&app, "Bravos").await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/matches",
                format!(
                    r#"{{"team1_id": "{}", "team2_id": "{}", "overs_per_innings": 20}}"#,
                    team_a.id, team_b.id
                ),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let fixture: MatchModel = serde_json::from_slice(&body).unwrap();
        assert_eq!(fixture.status, MatchStatus::Upcoming);

        let started = app
            .oneshot(post_json(
                &format!("/matches/{}/start", fixture.id),
                format!(
                    r#"{{"toss_winner_id": "{}", "elected_to": "bat"}}"#,
                    team_a.id
                ),
            ))
            .await
            .unwrap();
        assert_eq!(started.status(), StatusCode::OK);

        let body = axum::body::to_bytes(started.into_body(), usize::MAX)
            .await
            .unwrap();
        let fixture: MatchModel = serde_json::from_slice(&body).unwrap();
        assert_eq!(fixture.status, MatchStatus::Ongoing);
        assert_eq!(fixture.toss_winner_id, Some(team_a.id));
    }

    #[tokio::test]
    async fn rejects_matches_between_unknown_teams() {
        let app = app();

        let response = app
            .oneshot(post_json(
                "/matches",
                r#"{"team1_id": "ghost-1", "team2_id": "ghost-2", "overs_per_innings": 20}"#
                    .to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
