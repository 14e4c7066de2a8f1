//! Health check and storage probe endpoints

use axum::Json;
use axum::extract::State;

use crate::state::AppState;

/// Liveness probe. Exposes the active storage mode so operators can detect
/// fallback operation; the domain API itself stays backend-agnostic.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ok": true,
        "service": "truckstop",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": state.storage.mode().as_str(),
    }))
}

/// Explicitly re-probe the durable store. The only way back to durable mode
/// once the startup probe has failed.
pub async fn reprobe(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mode = state.storage.reprobe().await;
    Json(serde_json::json!({ "storage": mode.as_str() }))
}
