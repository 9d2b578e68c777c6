//! EventBuddy API server
//!
//! Main application entry point

use anyhow::Context;
use tracing::{error, info};

use event_buddy::{
    config::Settings,
    database::{create_pool, run_migrations},
    handlers::build_router,
    state::AppState,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", event_buddy::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&settings.database)
        .await
        .context("failed to connect to database")?;
    run_migrations(&db_pool).await?;

    info!("Initializing services...");
    let state = AppState::from_pool(settings.clone(), db_pool).await?;

    let health = state.services.health_check().await;
    for issue in health.get_issues() {
        error!(issue = %issue, "Startup health check issue");
    }
    match state.services.database.get_system_stats().await {
        Ok(stats) => info!(stats = %stats, "Loaded existing data"),
        Err(e) => error!(error = %e, "Failed to read system stats"),
    }

    // Periodically drop throttling state for idle email addresses
    let limiter = state.login_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            limiter.retain_recent();
        }
    });

    let app = build_router(state);
    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!(address = %address, "EventBuddy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("EventBuddy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
