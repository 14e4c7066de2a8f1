//! Availability override endpoints

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::models::{AvailabilityOverride, AvailabilityStatus};

use super::ApiResult;
use crate::state::AppState;

/// Upsert payload; `date` accepts "YYYY-MM-DD" or an RFC 3339 timestamp
#[derive(Debug, Deserialize)]
pub struct UpdateAvailabilityBody {
    pub date: String,
    pub is_available: bool,
    pub reason: Option<String>,
}

pub async fn update_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateAvailabilityBody>,
) -> ApiResult<AvailabilityOverride> {
    Ok(Json(
        state
            .service
            .update_availability(&id, &body.date, body.is_available, body.reason)
            .await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct CheckAvailabilityQuery {
    pub date: Option<String>,
}

pub async fn check_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<CheckAvailabilityQuery>,
) -> ApiResult<AvailabilityStatus> {
    Ok(Json(
        state
            .service
            .check_availability(&id, query.date.as_deref())
            .await?,
    ))
}
