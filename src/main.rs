mod event;
mod fixture;
mod scoring;
mod shared;
mod standings;
mod team;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use event::{EventBus, EventDispatcher};
use fixture::repository::InMemoryMatchRepository;
use fixture::service::MatchService;
use scoring::repository::{InMemoryDeliveryRepository, InMemoryScoreboardRepository};
use scoring::service::{ScoreboardSubscriber, ScoringService};
use shared::AppState;
use standings::repository::InMemoryStandingsRepository;
use standings::service::{StandingsService, StandingsSubscriber};
use team::repository::InMemoryTeamRepository;
use team::service::TeamService;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scorebox=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cricket tournament scoring server");

    // Shared event bus carrying the change-notification stream
    let event_bus = EventBus::new();

    // Repositories with dependency injection - in-memory by default.
    // For production with PostgreSQL:
    // let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    // let pool = sqlx::PgPool::connect(&database_url).await.expect("Failed to connect to database");
    // let delivery_repository = Arc::new(scoring::repository::PostgresDeliveryRepository::new(pool));
    let team_repository = Arc::new(InMemoryTeamRepository::new());
    let match_repository = Arc::new(InMemoryMatchRepository::new());
    let delivery_repository = Arc::new(InMemoryDeliveryRepository::new());
    let scoreboard_repository = Arc::new(InMemoryScoreboardRepository::new());
    let standings_repository = Arc::new(InMemoryStandingsRepository::new());

    // Services
    let team_service = Arc::new(TeamService::new(team_repository.clone()));
    let match_service = Arc::new(MatchService::new(
        match_repository.clone(),
        team_repository.clone(),
        event_bus.clone(),
    ));
    let scoring_service = Arc::new(ScoringService::new(
        delivery_repository,
        scoreboard_repository.clone(),
        match_repository.clone(),
        team_repository.clone(),
        event_bus.clone(),
    ));
    let standings_service = Arc::new(StandingsService::new(
        match_repository.clone(),
        scoreboard_repository,
        team_repository,
        standings_repository,
    ));

    // Event-driven recomputation: seed scoreboards on match start,
    // rebuild the tournament table on match completion.
    let mut dispatcher = EventDispatcher::new(event_bus.clone());
    dispatcher.add_handler(Arc::new(ScoreboardSubscriber::new(
        scoring_service.clone(),
        match_repository,
    )));
    dispatcher.add_handler(Arc::new(StandingsSubscriber::new(
        standings_service.clone(),
        event_bus.clone(),
    )));
    dispatcher.start_listening().await;

    let app_state = AppState::new(
        team_service,
        match_service,
        scoring_service,
        standings_service,
        event_bus,
    );

    // build our application
    let app = Router::new()
        .route(
            "/teams",
            get(team::handlers::list_teams).post(team::handlers::create_team),
        )
        .route(
            "/teams/:team_id",
            get(team::handlers::get_team).delete(team::handlers::delete_team),
        )
        .route(
            "/teams/:team_id/players",
            get(team::handlers::roster).post(team::handlers::add_player),
        )
        .route(
            "/matches",
            get(fixture::handlers::list_matches).post(fixture::handlers::create_match),
        )
        .route("/matches/:match_id", get(fixture::handlers::get_match))
        .route("/matches/:match_id/start", post(fixture::handlers::start_match))
        .route("/matches/:match_id/status", post(fixture::handlers::update_status))
        .route(
            "/matches/:match_id/balls",
            get(scoring::handlers::list_balls).post(scoring::handlers::record_ball),
        )
        .route(
            "/matches/:match_id/balls/:ball_id",
            put(scoring::handlers::amend_ball).delete(scoring::handlers::remove_ball),
        )
        .route(
            "/matches/:match_id/scoreboard",
            get(scoring::handlers::live_scoreboard),
        )
        .route(
            "/matches/:match_id/scorecard",
            get(scoring::handlers::scorecard),
        )
        .route("/standings", get(standings::handlers::standings))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // run our app with hyper, listening globally on port 3000
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}
