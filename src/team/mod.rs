pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;

pub use models::{PlayerModel, TeamModel};
pub use repository::{InMemoryTeamRepository, TeamRepository};
pub use service::TeamService;
