//! Canvass server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use canvass_api::{middleware::AppState, router as api_router};
use canvass_common::Config;
use canvass_core::{
    AuthService, FormService, SeedService, StatsService, SubmissionService, UserService,
};
use canvass_db::repositories::{
    FormRepository, SectionRepository, StatRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "canvass=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting canvass server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = canvass_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    canvass_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let form_repo = FormRepository::new(Arc::clone(&db));
    let section_repo = SectionRepository::new(Arc::clone(&db));
    let stat_repo = StatRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(user_repo.clone());
    let auth_service = AuthService::new(user_repo.clone(), &config);
    let form_service = FormService::new(form_repo.clone(), section_repo.clone());
    let submission_service =
        SubmissionService::new(form_repo.clone(), section_repo.clone(), stat_repo.clone());
    let stats_service = StatsService::new(form_repo, section_repo, stat_repo);
    let seed_service = SeedService::new(user_service.clone(), form_service.clone());

    if config.seed.enabled {
        info!("Seeding demo data...");
        seed_service.run().await?;
    }

    // Create app state
    let state = AppState {
        user_service,
        auth_service,
        form_service,
        submission_service,
        stats_service,
        seed_service,
    };

    // Build router
    let app = Router::new()
        .merge(api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            canvass_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
