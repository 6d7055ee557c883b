// Library crate for the cricket tournament scoring server
// This file exposes the public API for integration tests

pub mod event;
pub mod fixture;
pub mod scoring;
pub mod shared;
pub mod standings;
pub mod team;

// Re-export commonly used types for easier access in tests
pub use event::{EventBus, EventDispatcher, MatchEvent, MatchEventHandler};
pub use fixture::{MatchModel, MatchService, MatchStatus};
pub use scoring::{Delivery, ScoringService};
pub use shared::{AppError, AppState};
pub use standings::{Standing, StandingsService};
pub use team::{PlayerModel, TeamModel, TeamService};
