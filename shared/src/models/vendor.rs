//! Vendor model (food truck)

use serde::{Deserialize, Serialize};

/// Vendor entity. Never hard-deleted; `is_active` is the lifecycle flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Create vendor payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorCreate {
    pub name: String,
    pub description: Option<String>,
}
