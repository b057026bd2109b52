//! Countdown Timer - A countdown timer state machine with an HTTP front end
//!
//! This is the main entry point for the countdown-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use countdown_timer::{
    config::Config,
    state::{AppState, TimerController},
    api::create_router,
    services::{load_saved_timer, save_timer},
    tasks::{status_log_task, CountdownEngine},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms, max_duration={:?}",
          config.host, config.port, config.tick_ms, config.max_duration);

    let engine = CountdownEngine::new(config.tick_interval())?;
    let timer = TimerController::new(engine, config.max_duration);

    // Restore the previous session if one was saved
    if let Some(path) = &config.state_file {
        match load_saved_timer(path).await {
            Ok(Some(saved)) => {
                if let Err(e) = timer.restore(saved) {
                    warn!("Failed to restore saved timer: {}", e);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("{}, starting fresh", e),
        }
    }

    // Log status transitions in the background
    tokio::spawn(status_log_task(timer.subscribe()));

    let state = Arc::new(AppState::new(timer.clone(), config.port, config.host.clone()));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /time   - Add time ({{\"amount\": n, \"unit\": \"hours|minutes|seconds\"}})");
    info!("  POST /reset  - Reset the configured duration");
    info!("  POST /start  - Start the countdown");
    info!("  POST /stop   - Stop the countdown");
    info!("  GET  /status - Current status and display");
    info!("  GET  /health - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if let Some(path) = &config.state_file {
        let saved = timer.saved()?;
        if let Err(e) = save_timer(path, &saved).await {
            tracing::error!("{}", e);
        }
    }
    timer.on_stop()?;

    info!("Server shutdown complete");
    Ok(())
}
