pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;

pub use models::{ElectedTo, MatchModel, MatchStatus};
pub use repository::{InMemoryMatchRepository, MatchRepository};
pub use service::MatchService;
