//! Focus Timer - A Pomodoro countdown served over HTTP
//! 
//! This is the main entry point for the focus-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use focus_timer::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::console_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focus-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, session={}min, webhook={}",
          config.host, config.port, config.minutes,
          config.webhook_url.as_deref().unwrap_or("disabled"));

    let hooks = config.completion_hooks()?;
    if !hooks.chime.is_available() {
        info!("Audio output unavailable, completion chime disabled");
    }

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.minutes,
        hooks,
    ));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;
    
    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start    - Start or resume the timer");
    info!("  POST /pause    - Pause the timer");
    info!("  POST /toggle   - Start when stopped, pause when running");
    info!("  POST /reset    - Refill the current session");
    info!("  POST /duration - Set a custom session length in minutes");
    info!("  POST /input    - Clear the duration input error");
    info!("  GET  /status   - Current timer and server status");
    info!("  GET  /events   - Timer updates as server-sent events");
    info!("  GET  /health   - Health check");

    let console = async {
        if config.console {
            console_task(Arc::clone(&state)).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    // Setup graceful shutdown
    let server = axum::serve(listener, app);
    
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = console => {
            info!("Console closed");
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if let Err(e) = state.pause() {
        tracing::warn!("Failed to stop timer on shutdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
