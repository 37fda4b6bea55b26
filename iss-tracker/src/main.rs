use iss_tracker::refresher::{self, Refresher};
use iss_tracker::{AppState, TrackerConfig, geo, source};

use anyhow::{Context, Result};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = TrackerConfig::load()?;

    // Initialize logging
    let _logging_guard = iss_tracker::logging::init_logging(&config)?;

    tracing::info!("ISS tracker starting...");
    tracing::debug!("Configuration: {:?}", config);

    let source = source::from_config(&config.source)?;
    let geocoder = geo::from_config(&config.geocoder)?;
    let state = AppState::new(
        source,
        geocoder,
        Duration::from_secs(config.geocoder.timeout_secs),
    );

    // Load data before accepting requests
    refresher::initial_refresh(&state.refresh, refresher::STARTUP_ATTEMPTS).await;

    if let Some(minutes) = config.refresh_interval_minutes {
        Refresher::new(state.refresh.clone(), minutes).start();
    }

    let app = iss_tracker::create_router(state, config.enable_cors);

    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
