//! Volatile fallback store
//!
//! In-process tables standing in for PostgreSQL when it is unreachable.
//! Ids are decimal strings of a process-local counter; rows live in plain
//! `Vec`s so list order is insertion order, which keeps distance-tie ordering
//! in proximity results deterministic. Nothing survives a restart.

use std::sync::Arc;

use chrono::NaiveDate;
use shared::models::{
    AvailabilityOverride, AvailabilityUpsert, Schedule, ScheduleCreate, ScheduleUpdate, Vendor,
    VendorCreate,
};
use tokio::sync::Mutex;

use super::{ScheduleStore, StorageResult};

#[derive(Default)]
struct Tables {
    counter: u64,
    vendors: Vec<Vendor>,
    schedules: Vec<Schedule>,
    overrides: Vec<AvailabilityOverride>,
}

impl Tables {
    /// Fresh synthetic id; caller-supplied ids are never honored
    fn next_id(&mut self) -> String {
        self.counter += 1;
        self.counter.to_string()
    }
}

/// In-memory store shared by all request handlers.
///
/// The single mutex serializes every mutation, so concurrent creates cannot
/// race on the shared counter or lose updates.
#[derive(Clone)]
pub struct MemStore {
    inner: Arc<Mutex<Tables>>,
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStore {
    /// Build the store seeded with one demo vendor and schedule, so list
    /// endpoints are non-empty for smoke tests in fallback mode.
    pub fn new() -> Self {
        let mut tables = Tables::default();

        let vendor_id = tables.next_id();
        tables.vendors.push(Vendor {
            id: vendor_id.clone(),
            name: "Demo Truck".into(),
            description: Some("Seeded fallback record".into()),
            is_active: true,
        });
        let schedule_id = tables.next_id();
        tables.schedules.push(Schedule {
            id: schedule_id,
            vendor_id,
            location_name: "Marienplatz".into(),
            address: "Marienplatz 1, Munich".into(),
            latitude: 48.1374,
            longitude: 11.5755,
            day_of_week: 1,
            start_time: "11:00".into(),
            end_time: "14:00".into(),
            is_active: true,
            special_event: None,
        });

        Self {
            inner: Arc::new(Mutex::new(tables)),
        }
    }
}

impl ScheduleStore for MemStore {
    async fn create_vendor(&self, data: VendorCreate) -> StorageResult<Vendor> {
        let mut tables = self.inner.lock().await;
        let vendor = Vendor {
            id: tables.next_id(),
            name: data.name,
            description: data.description,
            is_active: true,
        };
        tables.vendors.push(vendor.clone());
        Ok(vendor)
    }

    async fn list_vendors(&self) -> StorageResult<Vec<Vendor>> {
        let tables = self.inner.lock().await;
        Ok(tables
            .vendors
            .iter()
            .filter(|v| v.is_active)
            .cloned()
            .collect())
    }

    async fn get_vendor(&self, id: &str) -> StorageResult<Option<Vendor>> {
        let tables = self.inner.lock().await;
        Ok(tables.vendors.iter().find(|v| v.id == id).cloned())
    }

    async fn create_schedule(&self, data: ScheduleCreate) -> StorageResult<Schedule> {
        let mut tables = self.inner.lock().await;
        let schedule = Schedule {
            id: tables.next_id(),
            vendor_id: data.vendor_id,
            location_name: data.location_name,
            address: data.address,
            latitude: data.latitude,
            longitude: data.longitude,
            day_of_week: data.day_of_week,
            start_time: data.start_time,
            end_time: data.end_time,
            is_active: true,
            special_event: data.special_event,
        };
        tables.schedules.push(schedule.clone());
        Ok(schedule)
    }

    async fn list_active_schedules(&self) -> StorageResult<Vec<Schedule>> {
        let tables = self.inner.lock().await;
        Ok(tables
            .schedules
            .iter()
            .filter(|s| s.is_active)
            .cloned()
            .collect())
    }

    async fn get_schedule(&self, id: &str) -> StorageResult<Option<Schedule>> {
        let tables = self.inner.lock().await;
        Ok(tables.schedules.iter().find(|s| s.id == id).cloned())
    }

    async fn update_schedule(
        &self,
        id: &str,
        data: ScheduleUpdate,
    ) -> StorageResult<Option<Schedule>> {
        let mut tables = self.inner.lock().await;
        let Some(schedule) = tables.schedules.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };

        if let Some(v) = data.location_name {
            schedule.location_name = v;
        }
        if let Some(v) = data.address {
            schedule.address = v;
        }
        if let Some(v) = data.latitude {
            schedule.latitude = v;
        }
        if let Some(v) = data.longitude {
            schedule.longitude = v;
        }
        if let Some(v) = data.day_of_week {
            schedule.day_of_week = v;
        }
        if let Some(v) = data.start_time {
            schedule.start_time = v;
        }
        if let Some(v) = data.end_time {
            schedule.end_time = v;
        }
        if let Some(v) = data.is_active {
            schedule.is_active = v;
        }
        if let Some(v) = data.special_event {
            schedule.special_event = Some(v);
        }

        Ok(Some(schedule.clone()))
    }

    async fn deactivate_schedule(&self, id: &str) -> StorageResult<Option<Schedule>> {
        self.update_schedule(
            id,
            ScheduleUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }

    async fn list_schedules_for_vendor(&self, vendor_id: &str) -> StorageResult<Vec<Schedule>> {
        let tables = self.inner.lock().await;
        Ok(tables
            .schedules
            .iter()
            .filter(|s| s.is_active && s.vendor_id == vendor_id)
            .cloned()
            .collect())
    }

    async fn upsert_availability(
        &self,
        schedule_id: &str,
        data: AvailabilityUpsert,
    ) -> StorageResult<AvailabilityOverride> {
        let mut tables = self.inner.lock().await;

        if let Some(row) = tables
            .overrides
            .iter_mut()
            .find(|o| o.schedule_id == schedule_id && o.date == data.date)
        {
            row.is_available = data.is_available;
            row.reason = data.reason;
            return Ok(row.clone());
        }

        let row = AvailabilityOverride {
            id: tables.next_id(),
            schedule_id: schedule_id.to_string(),
            date: data.date,
            is_available: data.is_available,
            reason: data.reason,
        };
        tables.overrides.push(row.clone());
        Ok(row)
    }

    async fn get_availability(
        &self,
        schedule_id: &str,
        date: NaiveDate,
    ) -> StorageResult<Option<AvailabilityOverride>> {
        let tables = self.inner.lock().await;
        Ok(tables
            .overrides
            .iter()
            .find(|o| o.schedule_id == schedule_id && o.date == date)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule_create(vendor_id: &str) -> ScheduleCreate {
        ScheduleCreate {
            vendor_id: vendor_id.to_string(),
            location_name: "Viktualienmarkt".into(),
            address: "Viktualienmarkt 3, Munich".into(),
            latitude: 48.1351,
            longitude: 11.5762,
            day_of_week: 3,
            start_time: "10:00".into(),
            end_time: "15:00".into(),
            special_event: None,
        }
    }

    #[tokio::test]
    async fn seeded_tables_are_non_empty() {
        let store = MemStore::new();
        assert_eq!(store.list_vendors().await.unwrap().len(), 1);
        assert_eq!(store.list_active_schedules().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_assigns_monotonic_counter_ids() {
        let store = MemStore::new();
        let a = store
            .create_vendor(VendorCreate {
                name: "Taco Cart".into(),
                description: None,
            })
            .await
            .unwrap();
        let b = store
            .create_vendor(VendorCreate {
                name: "Curry Van".into(),
                description: None,
            })
            .await
            .unwrap();
        // Two seed rows consume ids 1 and 2
        assert_eq!(a.id, "3");
        assert_eq!(b.id, "4");
    }

    #[tokio::test]
    async fn update_and_deactivate_missing_id_return_none() {
        let store = MemStore::new();
        let updated = store
            .update_schedule("999", ScheduleUpdate::default())
            .await
            .unwrap();
        assert!(updated.is_none());
        assert!(store.deactivate_schedule("999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deactivated_schedule_hidden_from_lists_but_fetchable() {
        let store = MemStore::new();
        let vendor = store
            .create_vendor(VendorCreate {
                name: "Taco Cart".into(),
                description: None,
            })
            .await
            .unwrap();
        let schedule = store
            .create_schedule(schedule_create(&vendor.id))
            .await
            .unwrap();

        store.deactivate_schedule(&schedule.id).await.unwrap();

        let active = store.list_active_schedules().await.unwrap();
        assert!(active.iter().all(|s| s.id != schedule.id));
        assert!(
            store
                .list_schedules_for_vendor(&vendor.id)
                .await
                .unwrap()
                .is_empty()
        );

        let fetched = store.get_schedule(&schedule.id).await.unwrap().unwrap();
        assert!(!fetched.is_active);
    }

    #[tokio::test]
    async fn upsert_availability_mutates_in_place() {
        let store = MemStore::new();
        let date = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();

        let first = store
            .upsert_availability(
                "2",
                AvailabilityUpsert {
                    date,
                    is_available: false,
                    reason: Some("maintenance".into()),
                },
            )
            .await
            .unwrap();
        let second = store
            .upsert_availability(
                "2",
                AvailabilityUpsert {
                    date,
                    is_available: true,
                    reason: None,
                },
            )
            .await
            .unwrap();

        // Same row, last write wins
        assert_eq!(first.id, second.id);
        let row = store.get_availability("2", date).await.unwrap().unwrap();
        assert!(row.is_available);
        assert_eq!(row.reason, None);
    }
}
