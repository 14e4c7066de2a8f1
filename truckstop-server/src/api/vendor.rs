//! Vendor (food truck) endpoints

use axum::Json;
use axum::extract::{Path, State};
use shared::models::{Schedule, Vendor, VendorCreate};

use super::ApiResult;
use crate::state::AppState;

pub async fn create_vendor(
    State(state): State<AppState>,
    Json(data): Json<VendorCreate>,
) -> ApiResult<Vendor> {
    Ok(Json(state.service.create_vendor(data).await?))
}

pub async fn list_vendors(State(state): State<AppState>) -> ApiResult<Vec<Vendor>> {
    Ok(Json(state.service.list_vendors().await?))
}

pub async fn get_vendor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vendor> {
    Ok(Json(state.service.get_vendor(&id).await?))
}

pub async fn get_vendor_schedules(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Schedule>> {
    Ok(Json(state.service.get_vendor_schedules(&id).await?))
}
