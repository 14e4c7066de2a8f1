//! API routes for truckstop-server

pub mod availability;
pub mod health;
pub mod schedule;
pub mod vendor;

use axum::Router;
use axum::routing::{delete, get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Result alias shared by all handlers
pub type ApiResult<T> = Result<axum::Json<T>, shared::error::AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/schedule/health", get(health::health_check))
        .route("/api/storage/reprobe", post(health::reprobe))
        .route("/api/food-trucks", post(vendor::create_vendor))
        .route("/api/food-trucks", get(vendor::list_vendors))
        .route("/api/food-trucks/{id}", get(vendor::get_vendor))
        .route(
            "/api/food-trucks/{id}/schedule",
            get(vendor::get_vendor_schedules),
        )
        .route("/api/schedules", post(schedule::create_schedule))
        .route("/api/schedules", get(schedule::list_schedules))
        .route("/api/schedules/today", get(schedule::today_schedules))
        .route("/api/schedules/near", get(schedule::schedules_near))
        .route("/api/schedules/{id}", get(schedule::get_schedule))
        .route("/api/schedules/{id}", put(schedule::update_schedule))
        .route("/api/schedules/{id}", delete(schedule::delete_schedule))
        .route(
            "/api/schedules/{id}/availability",
            post(availability::update_availability),
        )
        .route(
            "/api/schedules/{id}/availability",
            get(availability::check_availability),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
