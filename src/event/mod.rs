// Event-driven recomputation infrastructure
//
// This module carries the change-notification stream between the scoring
// write path and the derived views (scoreboard snapshots, standings).

// Public API - what other modules can use
pub use bus::EventBus;
pub use dispatcher::EventDispatcher;
pub use events::MatchEvent;
pub use handler::{EventError, MatchEventHandler, NoOpMatchEventHandler};

// Internal modules
mod bus;
mod dispatcher;
mod events;
mod handler;
