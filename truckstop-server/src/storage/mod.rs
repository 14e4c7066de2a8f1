//! Storage layer
//!
//! One contract ([`ScheduleStore`]) implemented by two backends: the durable
//! PostgreSQL adapter and a volatile in-memory table. [`Storage`] owns both
//! and routes every call based on a sticky mode flag set by a single
//! connectivity probe at construction. There is no per-call retry-then-
//! fallback; once the probe fails the process stays on the in-memory store
//! until an explicit re-probe.

pub mod memory;
pub mod postgres;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use shared::error::AppError;
use shared::models::{
    AvailabilityOverride, AvailabilityUpsert, Schedule, ScheduleCreate, ScheduleUpdate, Vendor,
    VendorCreate,
};
use thiserror::Error;

pub use memory::MemStore;
pub use postgres::PgStore;

/// Storage error types
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Tls(_) => StorageError::Unavailable(err.to_string()),
            _ => StorageError::Database(err.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unavailable(msg) => AppError::Unavailable(msg),
            StorageError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Which backend answers domain calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Durable,
    Fallback,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Durable => "durable",
            StorageMode::Fallback => "fallback",
        }
    }
}

/// Storage contract exposed identically by both backends.
///
/// Reads on a missing identifier return `Ok(None)` (or an empty list), never
/// an error. Connectivity failures surface as [`StorageError::Unavailable`].
#[allow(async_fn_in_trait)]
pub trait ScheduleStore {
    async fn create_vendor(&self, data: VendorCreate) -> StorageResult<Vendor>;
    async fn list_vendors(&self) -> StorageResult<Vec<Vendor>>;
    async fn get_vendor(&self, id: &str) -> StorageResult<Option<Vendor>>;

    async fn create_schedule(&self, data: ScheduleCreate) -> StorageResult<Schedule>;
    async fn list_active_schedules(&self) -> StorageResult<Vec<Schedule>>;
    async fn get_schedule(&self, id: &str) -> StorageResult<Option<Schedule>>;
    async fn update_schedule(
        &self,
        id: &str,
        data: ScheduleUpdate,
    ) -> StorageResult<Option<Schedule>>;
    async fn deactivate_schedule(&self, id: &str) -> StorageResult<Option<Schedule>>;
    async fn list_schedules_for_vendor(&self, vendor_id: &str) -> StorageResult<Vec<Schedule>>;

    async fn upsert_availability(
        &self,
        schedule_id: &str,
        data: AvailabilityUpsert,
    ) -> StorageResult<AvailabilityOverride>;
    async fn get_availability(
        &self,
        schedule_id: &str,
        date: NaiveDate,
    ) -> StorageResult<Option<AvailabilityOverride>>;
}

/// Storage selector: durable PostgreSQL adapter with in-memory fallback.
///
/// Both backends live for the whole process. The mode flag is shared across
/// all cloned handles, so an explicit re-probe is visible to every request.
#[derive(Clone)]
pub struct Storage {
    durable: Option<PgStore>,
    fallback: MemStore,
    use_durable: Arc<AtomicBool>,
}

impl Storage {
    /// Connect lazily to the durable store, then probe it once.
    ///
    /// Never fails: a bad URL or unreachable database leaves the process in
    /// fallback mode. All writes in fallback mode are lost on restart.
    pub async fn connect(database_url: &str) -> Self {
        let durable = match PgStore::connect_lazy(database_url) {
            Ok(pg) => Some(pg),
            Err(err) => {
                tracing::warn!("Invalid database URL, durable store disabled: {err}");
                None
            }
        };

        let storage = Self {
            durable,
            fallback: MemStore::new(),
            use_durable: Arc::new(AtomicBool::new(false)),
        };
        storage.reprobe().await;
        storage
    }

    /// Build a selector pinned to the in-memory backend (tests)
    #[cfg(test)]
    pub fn fallback_only() -> Self {
        Self {
            durable: None,
            fallback: MemStore::new(),
            use_durable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Probe the durable store and update the mode flag.
    ///
    /// Runs pending migrations on a successful probe so a freshly provisioned
    /// database is usable immediately.
    pub async fn reprobe(&self) -> StorageMode {
        let healthy = match &self.durable {
            Some(pg) => match pg.ping().await {
                Ok(()) => match pg.migrate().await {
                    Ok(()) => true,
                    Err(err) => {
                        tracing::warn!("Migrations failed, staying on fallback store: {err}");
                        false
                    }
                },
                Err(err) => {
                    tracing::warn!("Durable store probe failed: {err}");
                    false
                }
            },
            None => false,
        };

        self.use_durable.store(healthy, Ordering::Relaxed);
        if healthy {
            tracing::info!("Durable store probe ok");
        } else {
            tracing::warn!("Using in-memory fallback storage (volatile, lost on restart)");
        }
        self.mode()
    }

    /// Current backend mode
    pub fn mode(&self) -> StorageMode {
        if self.use_durable.load(Ordering::Relaxed) {
            StorageMode::Durable
        } else {
            StorageMode::Fallback
        }
    }

    fn pg(&self) -> Option<&PgStore> {
        match self.mode() {
            StorageMode::Durable => self.durable.as_ref(),
            StorageMode::Fallback => None,
        }
    }
}

impl ScheduleStore for Storage {
    async fn create_vendor(&self, data: VendorCreate) -> StorageResult<Vendor> {
        match self.pg() {
            Some(pg) => pg.create_vendor(data).await,
            None => self.fallback.create_vendor(data).await,
        }
    }

    async fn list_vendors(&self) -> StorageResult<Vec<Vendor>> {
        match self.pg() {
            Some(pg) => pg.list_vendors().await,
            None => self.fallback.list_vendors().await,
        }
    }

    async fn get_vendor(&self, id: &str) -> StorageResult<Option<Vendor>> {
        match self.pg() {
            Some(pg) => pg.get_vendor(id).await,
            None => self.fallback.get_vendor(id).await,
        }
    }

    async fn create_schedule(&self, data: ScheduleCreate) -> StorageResult<Schedule> {
        match self.pg() {
            Some(pg) => pg.create_schedule(data).await,
            None => self.fallback.create_schedule(data).await,
        }
    }

    async fn list_active_schedules(&self) -> StorageResult<Vec<Schedule>> {
        match self.pg() {
            Some(pg) => pg.list_active_schedules().await,
            None => self.fallback.list_active_schedules().await,
        }
    }

    async fn get_schedule(&self, id: &str) -> StorageResult<Option<Schedule>> {
        match self.pg() {
            Some(pg) => pg.get_schedule(id).await,
            None => self.fallback.get_schedule(id).await,
        }
    }

    async fn update_schedule(
        &self,
        id: &str,
        data: ScheduleUpdate,
    ) -> StorageResult<Option<Schedule>> {
        match self.pg() {
            Some(pg) => pg.update_schedule(id, data).await,
            None => self.fallback.update_schedule(id, data).await,
        }
    }

    async fn deactivate_schedule(&self, id: &str) -> StorageResult<Option<Schedule>> {
        match self.pg() {
            Some(pg) => pg.deactivate_schedule(id).await,
            None => self.fallback.deactivate_schedule(id).await,
        }
    }

    async fn list_schedules_for_vendor(&self, vendor_id: &str) -> StorageResult<Vec<Schedule>> {
        match self.pg() {
            Some(pg) => pg.list_schedules_for_vendor(vendor_id).await,
            None => self.fallback.list_schedules_for_vendor(vendor_id).await,
        }
    }

    async fn upsert_availability(
        &self,
        schedule_id: &str,
        data: AvailabilityUpsert,
    ) -> StorageResult<AvailabilityOverride> {
        match self.pg() {
            Some(pg) => pg.upsert_availability(schedule_id, data).await,
            None => self.fallback.upsert_availability(schedule_id, data).await,
        }
    }

    async fn get_availability(
        &self,
        schedule_id: &str,
        date: NaiveDate,
    ) -> StorageResult<Option<AvailabilityOverride>> {
        match self.pg() {
            Some(pg) => pg.get_availability(schedule_id, date).await,
            None => self.fallback.get_availability(schedule_id, date).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fallback_mode_serves_seeded_data() {
        let storage = Storage::fallback_only();
        assert_eq!(storage.mode(), StorageMode::Fallback);
        assert!(!storage.list_vendors().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reprobe_without_durable_backend_stays_sticky() {
        let storage = Storage::fallback_only();
        assert_eq!(storage.reprobe().await, StorageMode::Fallback);
        assert_eq!(storage.mode(), StorageMode::Fallback);
    }

    #[tokio::test]
    async fn fallback_writes_always_succeed() {
        let storage = Storage::fallback_only();
        let vendor = storage
            .create_vendor(VendorCreate {
                name: "Taco Cart".into(),
                description: None,
            })
            .await
            .unwrap();
        let fetched = storage.get_vendor(&vendor.id).await.unwrap();
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn mode_flag_is_shared_across_clones() {
        let storage = Storage::fallback_only();
        let clone = storage.clone();
        storage.use_durable.store(true, Ordering::Relaxed);
        assert_eq!(clone.mode(), StorageMode::Durable);
    }
}
