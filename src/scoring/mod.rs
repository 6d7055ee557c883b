pub mod handlers;
pub mod innings;
pub mod overs;
pub mod scoreboard;
pub mod scorecard;
pub mod service;

mod errors;
pub mod models;
pub mod repository;
pub mod types;

pub use errors::ScoringError;
pub use models::{Delivery, ExtraType, ScoreboardRow, WicketType};
pub use repository::{
    DeliveryRepository, InMemoryDeliveryRepository, InMemoryScoreboardRepository,
    PostgresDeliveryRepository, ScoreboardRepository,
};
pub use service::{ScoreboardSubscriber, ScoringService};
