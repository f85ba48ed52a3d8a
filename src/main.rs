//! Pomotask - A pomodoro task cycle server
//!
//! This is the main entry point for the pomotask application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use pomotask::{
    api::create_router,
    config::Config,
    render::StatusBoard,
    services::{HttpTaskApi, MemoryTaskApi, TaskApi},
    state::AppState,
    tasks::spawn_cycle,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomotask={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomotask server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, work={}min, break={}min",
        config.host, config.port, config.work_minutes, config.break_minutes
    );

    let api: Arc<dyn TaskApi> = match config.api_url.as_deref() {
        Some(url) => Arc::new(HttpTaskApi::new(url, config.request_timeout())?),
        None => {
            warn!("No --api-url given, tasks are kept in memory only");
            Arc::new(MemoryTaskApi::new())
        }
    };

    // Start the task cycle controller
    let board = Arc::new(StatusBoard::new());
    let channels = spawn_cycle(api, board.clone(), config.cycle_settings());

    let state = Arc::new(AppState::new(
        channels.commands,
        channels.snapshots,
        board,
        config.port,
        config.host.clone(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /start         - Start, resume or retry the cycle");
    info!("  POST   /pause         - Pause the running countdown");
    info!("  POST   /tasks         - Add a task");
    info!("  DELETE /tasks/:id     - Delete a task");
    info!("  POST   /reload        - Re-fetch tasks and reset the cycle");
    info!("  DELETE /notifications - Dismiss notifications");
    info!("  GET    /status        - Cycle state and task board");
    info!("  GET    /health        - Health check");

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

    info!("Server shutdown complete");
    Ok(())
}
