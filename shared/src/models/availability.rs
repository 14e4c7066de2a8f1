//! Per-date availability override model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One override per (schedule, calendar date). Absence means "available".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AvailabilityOverride {
    pub id: String,
    pub schedule_id: String,
    pub date: NaiveDate,
    pub is_available: bool,
    pub reason: Option<String>,
}

/// Upsert payload for a schedule's availability on one date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityUpsert {
    pub date: NaiveDate,
    pub is_available: bool,
    pub reason: Option<String>,
}

/// Availability check result; defaults to available when no override exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityStatus {
    pub schedule_id: String,
    pub date: NaiveDate,
    pub is_available: bool,
    pub reason: Option<String>,
}
