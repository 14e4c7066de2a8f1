//! truckstop-server — scheduling registry for mobile vendors
//!
//! Long-running service that:
//! - Stores recurring weekly time-slot/location bookings per vendor
//! - Tracks per-date availability overrides
//! - Answers geo-proximity queries over active schedules
//! - Falls back to a volatile in-memory store when PostgreSQL is unreachable

mod api;
mod config;
mod geo;
mod services;
mod state;
mod storage;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "truckstop_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting truckstop-server (env: {})", config.environment);

    // Initialize application state (probes the durable store exactly once)
    let state = AppState::new(&config).await;
    tracing::info!("Storage mode: {}", state.storage.mode().as_str());

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("truckstop-server HTTP listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
