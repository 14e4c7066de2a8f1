//! Schedule model (recurring weekly time-and-place booking)

use serde::{Deserialize, Serialize};

/// Schedule entity.
///
/// `day_of_week` uses 0 = Sunday .. 6 = Saturday. Times are zero-padded
/// `HH:mm` wall-clock strings with no timezone; lexicographic order equals
/// temporal order. "Deleting" a schedule flips `is_active` to false; inactive
/// rows are hidden from every read except get-by-id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Schedule {
    pub id: String,
    pub vendor_id: String,
    pub location_name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub day_of_week: i16,
    pub start_time: String,
    pub end_time: String,
    pub is_active: bool,
    pub special_event: Option<String>,
}

/// Create schedule payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleCreate {
    pub vendor_id: String,
    pub location_name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub day_of_week: i16,
    pub start_time: String,
    pub end_time: String,
    pub special_event: Option<String>,
}

/// Partial update payload; `None` fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleUpdate {
    pub location_name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub day_of_week: Option<i16>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_active: Option<bool>,
    pub special_event: Option<String>,
}

/// Proximity search result: a schedule plus its distance from the query point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleWithDistance {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub distance_km: f64,
}
