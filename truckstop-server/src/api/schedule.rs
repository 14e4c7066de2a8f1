//! Schedule endpoints

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::models::{Schedule, ScheduleCreate, ScheduleUpdate, ScheduleWithDistance};

use super::ApiResult;
use crate::state::AppState;

pub async fn create_schedule(
    State(state): State<AppState>,
    Json(data): Json<ScheduleCreate>,
) -> ApiResult<Schedule> {
    Ok(Json(state.service.create_schedule(data).await?))
}

pub async fn list_schedules(State(state): State<AppState>) -> ApiResult<Vec<Schedule>> {
    Ok(Json(state.service.get_all_schedules().await?))
}

pub async fn today_schedules(State(state): State<AppState>) -> ApiResult<Vec<Schedule>> {
    Ok(Json(state.service.get_today_schedules().await?))
}

/// Query parameters for proximity search
#[derive(Debug, Deserialize)]
pub struct NearQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: Option<f64>,
}

pub async fn schedules_near(
    State(state): State<AppState>,
    Query(query): Query<NearQuery>,
) -> ApiResult<Vec<ScheduleWithDistance>> {
    Ok(Json(
        state
            .service
            .find_schedules_near(query.latitude, query.longitude, query.radius_km)
            .await?,
    ))
}

pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Schedule> {
    Ok(Json(state.service.get_schedule(&id).await?))
}

pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<ScheduleUpdate>,
) -> ApiResult<Schedule> {
    Ok(Json(state.service.update_schedule(&id, data).await?))
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Schedule> {
    Ok(Json(state.service.delete_schedule(&id).await?))
}
