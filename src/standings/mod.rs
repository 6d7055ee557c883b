pub mod calculator;
pub mod service;

pub mod models;
pub mod repository;

pub use models::Standing;
pub use repository::{InMemoryStandingsRepository, StandingsRepository};
pub use service::{StandingsService, StandingsSubscriber};

pub mod handlers;
