//! Application state

use crate::config::Config;
use crate::services::ScheduleService;
use crate::storage::Storage;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Storage selector (durable + fallback), also serves the health probe
    pub storage: Storage,
    /// Domain service over the selector
    pub service: ScheduleService<Storage>,
}

impl AppState {
    /// Create a new AppState; probes the durable store exactly once
    pub async fn new(config: &Config) -> Self {
        let storage = Storage::connect(&config.database_url).await;
        let service = ScheduleService::new(storage.clone());
        Self { storage, service }
    }
}
