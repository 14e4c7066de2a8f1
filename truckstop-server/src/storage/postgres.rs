//! Durable store adapter (PostgreSQL)
//!
//! Translates the storage contract into sqlx queries. Row ids are freshly
//! generated UUID strings; the database enforces the vendor/schedule foreign
//! keys and the one-override-per-(schedule, date) constraint.

use chrono::NaiveDate;
use shared::models::{
    AvailabilityOverride, AvailabilityUpsert, Schedule, ScheduleCreate, ScheduleUpdate, Vendor,
    VendorCreate,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::{ScheduleStore, StorageResult};

const VENDOR_COLUMNS: &str = "id, name, description, is_active";
const SCHEDULE_COLUMNS: &str = "id, vendor_id, location_name, address, latitude, longitude, \
     day_of_week, start_time, end_time, is_active, special_event";
const OVERRIDE_COLUMNS: &str = "id, schedule_id, date, is_available, reason";

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a pool without touching the network; connections are opened on
    /// first use, so construction succeeds even when the database is down.
    pub fn connect_lazy(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Trivial connectivity probe
    pub async fn ping(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Run pending migrations
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

impl ScheduleStore for PgStore {
    async fn create_vendor(&self, data: VendorCreate) -> StorageResult<Vendor> {
        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            "INSERT INTO vendors (id, name, description, is_active)
             VALUES ($1, $2, $3, TRUE)
             RETURNING {VENDOR_COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(vendor)
    }

    async fn list_vendors(&self) -> StorageResult<Vec<Vendor>> {
        let vendors = sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {VENDOR_COLUMNS} FROM vendors WHERE is_active ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(vendors)
    }

    async fn get_vendor(&self, id: &str) -> StorageResult<Option<Vendor>> {
        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {VENDOR_COLUMNS} FROM vendors WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(vendor)
    }

    async fn create_schedule(&self, data: ScheduleCreate) -> StorageResult<Schedule> {
        let schedule = sqlx::query_as::<_, Schedule>(&format!(
            "INSERT INTO schedules (
                 id, vendor_id, location_name, address, latitude, longitude,
                 day_of_week, start_time, end_time, is_active, special_event
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE, $10)
             RETURNING {SCHEDULE_COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&data.vendor_id)
        .bind(&data.location_name)
        .bind(&data.address)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(data.day_of_week)
        .bind(&data.start_time)
        .bind(&data.end_time)
        .bind(&data.special_event)
        .fetch_one(&self.pool)
        .await?;
        Ok(schedule)
    }

    async fn list_active_schedules(&self) -> StorageResult<Vec<Schedule>> {
        let schedules = sqlx::query_as::<_, Schedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules
             WHERE is_active
             ORDER BY day_of_week, start_time, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(schedules)
    }

    async fn get_schedule(&self, id: &str) -> StorageResult<Option<Schedule>> {
        let schedule = sqlx::query_as::<_, Schedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(schedule)
    }

    async fn update_schedule(
        &self,
        id: &str,
        data: ScheduleUpdate,
    ) -> StorageResult<Option<Schedule>> {
        let schedule = sqlx::query_as::<_, Schedule>(&format!(
            "UPDATE schedules SET
                 location_name = COALESCE($2, location_name),
                 address = COALESCE($3, address),
                 latitude = COALESCE($4, latitude),
                 longitude = COALESCE($5, longitude),
                 day_of_week = COALESCE($6, day_of_week),
                 start_time = COALESCE($7, start_time),
                 end_time = COALESCE($8, end_time),
                 is_active = COALESCE($9, is_active),
                 special_event = COALESCE($10, special_event)
             WHERE id = $1
             RETURNING {SCHEDULE_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.location_name)
        .bind(&data.address)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(data.day_of_week)
        .bind(&data.start_time)
        .bind(&data.end_time)
        .bind(data.is_active)
        .bind(&data.special_event)
        .fetch_optional(&self.pool)
        .await?;
        Ok(schedule)
    }

    async fn deactivate_schedule(&self, id: &str) -> StorageResult<Option<Schedule>> {
        let schedule = sqlx::query_as::<_, Schedule>(&format!(
            "UPDATE schedules SET is_active = FALSE WHERE id = $1
             RETURNING {SCHEDULE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(schedule)
    }

    async fn list_schedules_for_vendor(&self, vendor_id: &str) -> StorageResult<Vec<Schedule>> {
        let schedules = sqlx::query_as::<_, Schedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules
             WHERE vendor_id = $1 AND is_active
             ORDER BY day_of_week, start_time, id"
        ))
        .bind(vendor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(schedules)
    }

    async fn upsert_availability(
        &self,
        schedule_id: &str,
        data: AvailabilityUpsert,
    ) -> StorageResult<AvailabilityOverride> {
        // One override per (schedule_id, date); a second write mutates in place
        let row = sqlx::query_as::<_, AvailabilityOverride>(&format!(
            "INSERT INTO availability_overrides (id, schedule_id, date, is_available, reason)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (schedule_id, date)
             DO UPDATE SET
                 is_available = EXCLUDED.is_available,
                 reason = EXCLUDED.reason
             RETURNING {OVERRIDE_COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(schedule_id)
        .bind(data.date)
        .bind(data.is_available)
        .bind(&data.reason)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_availability(
        &self,
        schedule_id: &str,
        date: NaiveDate,
    ) -> StorageResult<Option<AvailabilityOverride>> {
        let row = sqlx::query_as::<_, AvailabilityOverride>(&format!(
            "SELECT {OVERRIDE_COLUMNS} FROM availability_overrides
             WHERE schedule_id = $1 AND date = $2"
        ))
        .bind(schedule_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
