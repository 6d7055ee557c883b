use thiserror::Error;

use crate::shared::AppError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Match not found: {0}")]
    MatchNotFound(String),

    #[error("Delivery not found: {0}")]
    DeliveryNotFound(String),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl From<AppError> for ScoringError {
    fn from(error: AppError) -> Self {
        ScoringError::Repository(error.to_string())
    }
}
