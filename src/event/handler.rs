use async_trait::async_trait;
use thiserror::Error;

use super::events::MatchEvent;

/// Errors that can occur when handling match events
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Handler timed out")]
    Timeout,

    #[error("Retryable error: {0}")]
    Retryable(String),

    #[error("Non-retryable error: {0}")]
    NonRetryable(String),
}

impl EventError {
    /// Whether this error indicates the operation should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, EventError::Retryable(_) | EventError::Timeout)
    }

    /// Create a retryable error
    pub fn retryable(msg: impl Into<String>) -> Self {
        EventError::Retryable(msg.into())
    }

    /// Create a non-retryable error
    pub fn non_retryable(msg: impl Into<String>) -> Self {
        EventError::NonRetryable(msg.into())
    }
}

/// Trait for components that react to match events
///
/// Handlers are the recomputation triggers of the system: on a relevant
/// event they re-read the full log or result set and rebuild the derived
/// view from scratch. Handling the same event twice must therefore be
/// safe - a full recompute is idempotent by construction.
#[async_trait]
pub trait MatchEventHandler: Send + Sync {
    /// Handle a match event
    ///
    /// The handler should:
    /// - Check if the event is relevant to this handler
    /// - Recompute whatever derived state the event invalidates
    /// - Return Ok(()) on success or EventError on failure
    async fn handle(&self, event: &MatchEvent) -> Result<(), EventError>;

    /// Get a human-readable name for this handler (for logging/debugging)
    fn name(&self) -> &'static str;
}

/// A no-op event handler for tests that need a handler but no behavior
pub struct NoOpMatchEventHandler;

#[async_trait]
impl MatchEventHandler for NoOpMatchEventHandler {
    async fn handle(&self, _event: &MatchEvent) -> Result<(), EventError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "NoOpMatchEventHandler"
    }
}
