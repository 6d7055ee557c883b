use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::{
    models::{PlayerModel, TeamModel},
    types::{AddPlayerRequest, CreateTeamRequest},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for registering a new team
///
/// POST /teams
#[instrument(name = "create_team", skip(state, request))]
pub async fn create_team(
    State(state): State<AppState>,
    Json(request): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamModel>), AppError> {
    let team = state.team_service.create_team(request).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// HTTP handler for listing all teams
///
/// GET /teams
#[instrument(name = "list_teams", skip(state))]
pub async fn list_teams(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamModel>>, AppError> {
    let teams = state.team_service.list_teams().await?;
    Ok(Json(teams))
}

/// HTTP handler for fetching one team
///
/// GET /teams/:team_id
#[instrument(name = "get_team", skip(state))]
pub async fn get_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<TeamModel>, AppError> {
    let team = state
        .team_service
        .get_team(&team_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;
    Ok(Json(team))
}

/// HTTP handler for deleting a team and its roster
///
/// DELETE /teams/:team_id
#[instrument(name = "delete_team", skip(state))]
pub async fn delete_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.team_service.delete_team(&team_id).await?;
    info!(team_id = %team_id, "Team deleted via API");
    Ok(StatusCode::NO_CONTENT)
}

/// HTTP handler for adding a player to a team's roster
///
/// POST /teams/:team_id/players
#[instrument(name = "add_player", skip(state, request))]
pub async fn add_player(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Json(request): Json<AddPlayerRequest>,
) -> Result<(StatusCode, Json<PlayerModel>), AppError> {
    let player = state.team_service.add_player(&team_id, request).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// HTTP handler for listing a team's roster
///
/// GET /teams/:team_id/players
#[instrument(name = "roster", skip(state))]
pub async fn roster(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<Vec<PlayerModel>>, AppError> {
    let players = state.team_service.roster(&team_id).await?;
    Ok(Json(players))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::build_app_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::post,
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn app() -> Router {
        Router::new()
            .route("/teams", post(create_team).get(list_teams))
            .route("/teams/:team_id/players", post(add_player).get(roster))
            .with_state(build_app_state())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn creates_a_team_over_http() {
        let app = app();

        let response = app
            .oneshot(post_json(
                "/teams",
                r#"{"name": "Falcons", "captain": "Sam"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let team: TeamModel = serde_json::from_slice(&body).unwrap();
        assert_eq!(team.name, "Falcons");
        assert_eq!(team.captain.as_deref(), Some("Sam"));
        assert!(!team.id.is_empty());
    }

    #[tokio::test]
    async fn blank_team_names_are_rejected() {
        let app = app();

        let response = app
            .oneshot(post_json("/teams", r#"{"name": "   "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn adds_players_to_a_roster() {
        let app = app();

        let created = app
            .clone()
            .oneshot(post_json("/teams", r#"{"name": "Falcons"}"#))
            .await
            .unwrap();
        let body = axum::body::to_bytes(created.into_body(), usize::MAX)
            .await
            .unwrap();
        let team: TeamModel = serde_json::from_slice(&body).unwrap();

        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/teams/{}/players", team.id),
                r#"{"name": "Asha"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let listed = app
            .oneshot(
                Request::builder()
                    .uri(format!("/teams/{}/players", team.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(listed.into_body(), usize::MAX)
            .await
            .unwrap();
        let players: Vec<PlayerModel> = serde_json::from_slice(&body).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Asha");
    }
}
