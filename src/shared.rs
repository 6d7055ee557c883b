use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::event::EventBus;
use crate::fixture::service::MatchService;
use crate::scoring::ScoringError;
use crate::scoring::service::ScoringService;
use crate::standings::service::StandingsService;
use crate::team::service::TeamService;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub team_service: Arc<TeamService>,
    pub match_service: Arc<MatchService>,
    pub scoring_service: Arc<ScoringService>,
    pub standings_service: Arc<StandingsService>,
    pub event_bus: EventBus,
}

impl AppState {
    pub fn new(
        team_service: Arc<TeamService>,
        match_service: Arc<MatchService>,
        scoring_service: Arc<ScoringService>,
        standings_service: Arc<StandingsService>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            team_service,
            match_service,
            scoring_service,
            standings_service,
            event_bus,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl From<ScoringError> for AppError {
    fn from(error: ScoringError) -> Self {
        match error {
            ScoringError::Validation(msg) => AppError::BadRequest(msg),
            ScoringError::MatchNotFound(id) => AppError::NotFound(format!("Match not found: {id}")),
            ScoringError::DeliveryNotFound(id) => {
                AppError::NotFound(format!("Delivery not found: {id}"))
            }
            ScoringError::Repository(msg) => AppError::DatabaseError(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
