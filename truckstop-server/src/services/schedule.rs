//! Schedule service
//!
//! Domain operations expressed against the storage contract, independent of
//! which backend answers. Input validation happens here, before anything
//! reaches the storage layer. Overlapping bookings at the same vendor, day,
//! and location are permitted; this registry does no conflict detection.

use chrono::{DateTime, Datelike, Local, NaiveDate};
use shared::error::{AppError, AppResult};
use shared::models::{
    AvailabilityOverride, AvailabilityStatus, AvailabilityUpsert, Schedule, ScheduleCreate,
    ScheduleUpdate, ScheduleWithDistance, Vendor, VendorCreate,
};

use crate::geo;
use crate::storage::ScheduleStore;

/// Schedule service over any storage backend
#[derive(Clone)]
pub struct ScheduleService<S> {
    store: S,
}

impl<S: ScheduleStore> ScheduleService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // ===== Vendors =====

    pub async fn create_vendor(&self, data: VendorCreate) -> AppResult<Vendor> {
        if data.name.trim().is_empty() {
            return Err(AppError::validation("vendor name must not be empty"));
        }
        Ok(self.store.create_vendor(data).await?)
    }

    pub async fn list_vendors(&self) -> AppResult<Vec<Vendor>> {
        Ok(self.store.list_vendors().await?)
    }

    pub async fn get_vendor(&self, id: &str) -> AppResult<Vendor> {
        self.store
            .get_vendor(id)
            .await?
            .ok_or_else(|| AppError::not_found("vendor"))
    }

    /// Active schedules owned by one vendor
    pub async fn get_vendor_schedules(&self, vendor_id: &str) -> AppResult<Vec<Schedule>> {
        self.get_vendor(vendor_id).await?;
        Ok(self.store.list_schedules_for_vendor(vendor_id).await?)
    }

    // ===== Schedules =====

    pub async fn create_schedule(&self, data: ScheduleCreate) -> AppResult<Schedule> {
        validate_coordinates(data.latitude, data.longitude)?;
        validate_day_of_week(data.day_of_week)?;
        validate_time_pair(&data.start_time, &data.end_time)?;
        self.get_vendor(&data.vendor_id).await?;
        Ok(self.store.create_schedule(data).await?)
    }

    pub async fn get_all_schedules(&self) -> AppResult<Vec<Schedule>> {
        Ok(self.store.list_active_schedules().await?)
    }

    /// Active schedules for the host's local day-of-week (0 = Sunday),
    /// ordered by start time ascending. A day with no entries yields an
    /// empty vec.
    pub async fn get_today_schedules(&self) -> AppResult<Vec<Schedule>> {
        let today = Local::now().weekday().num_days_from_sunday() as i16;
        self.get_schedules_for_day(today).await
    }

    pub(crate) async fn get_schedules_for_day(&self, day_of_week: i16) -> AppResult<Vec<Schedule>> {
        let mut schedules: Vec<Schedule> = self
            .store
            .list_active_schedules()
            .await?
            .into_iter()
            .filter(|s| s.day_of_week == day_of_week)
            .collect();
        // Zero-padded HH:mm, so string order is temporal order
        schedules.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(schedules)
    }

    /// Proximity search over active schedules. `radius_km` defaults to 5
    /// and must be positive.
    pub async fn find_schedules_near(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    ) -> AppResult<Vec<ScheduleWithDistance>> {
        validate_coordinates(latitude, longitude)?;
        let radius_km = radius_km.unwrap_or(geo::DEFAULT_RADIUS_KM);
        if radius_km <= 0.0 {
            return Err(AppError::validation("radius_km must be positive"));
        }

        let candidates = self.store.list_active_schedules().await?;
        Ok(geo::filter_by_radius(
            candidates, latitude, longitude, radius_km,
        ))
    }

    pub async fn get_schedule(&self, id: &str) -> AppResult<Schedule> {
        self.store
            .get_schedule(id)
            .await?
            .ok_or_else(|| AppError::not_found("schedule"))
    }

    pub async fn update_schedule(&self, id: &str, data: ScheduleUpdate) -> AppResult<Schedule> {
        // Absent coordinates keep their stored (already validated) values
        validate_coordinates(
            data.latitude.unwrap_or(0.0),
            data.longitude.unwrap_or(0.0),
        )?;
        if let Some(day) = data.day_of_week {
            validate_day_of_week(day)?;
        }

        // The time invariant must hold for the merged record, so partial time
        // updates are checked against the stored counterpart.
        let current = self.get_schedule(id).await?;
        let start = data.start_time.as_deref().unwrap_or(&current.start_time);
        let end = data.end_time.as_deref().unwrap_or(&current.end_time);
        validate_time_pair(start, end)?;

        self.store
            .update_schedule(id, data)
            .await?
            .ok_or_else(|| AppError::not_found("schedule"))
    }

    /// Soft delete: flips `is_active` off. Availability overrides are kept.
    pub async fn delete_schedule(&self, id: &str) -> AppResult<Schedule> {
        self.store
            .deactivate_schedule(id)
            .await?
            .ok_or_else(|| AppError::not_found("schedule"))
    }

    // ===== Availability =====

    /// Calendar-day upsert: a second write for the same (schedule, date)
    /// mutates the existing override instead of inserting a duplicate.
    pub async fn update_availability(
        &self,
        schedule_id: &str,
        date: &str,
        is_available: bool,
        reason: Option<String>,
    ) -> AppResult<AvailabilityOverride> {
        let date = parse_calendar_date(date)?;
        self.get_schedule(schedule_id).await?;
        Ok(self
            .store
            .upsert_availability(
                schedule_id,
                AvailabilityUpsert {
                    date,
                    is_available,
                    reason,
                },
            )
            .await?)
    }

    /// Availability for one date (today when omitted). No override means
    /// available.
    pub async fn check_availability(
        &self,
        schedule_id: &str,
        date: Option<&str>,
    ) -> AppResult<AvailabilityStatus> {
        let date = match date {
            Some(raw) => parse_calendar_date(raw)?,
            None => Local::now().date_naive(),
        };
        self.get_schedule(schedule_id).await?;

        let status = match self.store.get_availability(schedule_id, date).await? {
            Some(row) => AvailabilityStatus {
                schedule_id: row.schedule_id,
                date: row.date,
                is_available: row.is_available,
                reason: row.reason,
            },
            None => AvailabilityStatus {
                schedule_id: schedule_id.to_string(),
                date,
                is_available: true,
                reason: None,
            },
        };
        Ok(status)
    }
}

fn validate_coordinates(latitude: f64, longitude: f64) -> AppResult<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(AppError::validation(format!(
            "latitude {latitude} out of range [-90, 90]"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::validation(format!(
            "longitude {longitude} out of range [-180, 180]"
        )));
    }
    Ok(())
}

fn validate_day_of_week(day: i16) -> AppResult<()> {
    if !(0..=6).contains(&day) {
        return Err(AppError::validation(format!(
            "day_of_week {day} out of range 0..=6 (0 = Sunday)"
        )));
    }
    Ok(())
}

/// Require zero-padded "HH:mm" with start strictly before end
fn validate_time_pair(start: &str, end: &str) -> AppResult<()> {
    for t in [start, end] {
        let ok = t.len() == 5
            && chrono::NaiveTime::parse_from_str(t, "%H:%M").is_ok();
        if !ok {
            return Err(AppError::validation(format!(
                "time {t:?} is not zero-padded HH:mm"
            )));
        }
    }
    if start >= end {
        return Err(AppError::validation(format!(
            "start_time {start:?} must be before end_time {end:?}"
        )));
    }
    Ok(())
}

/// Normalize a date string to a calendar day. Accepts plain "YYYY-MM-DD" or a
/// full RFC 3339 timestamp, whose time component is dropped.
fn parse_calendar_date(raw: &str) -> AppResult<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }
    Err(AppError::validation(format!(
        "date {raw:?} is neither YYYY-MM-DD nor RFC 3339"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemStore;

    fn service() -> ScheduleService<MemStore> {
        ScheduleService::new(MemStore::new())
    }

    async fn create_vendor(svc: &ScheduleService<MemStore>) -> Vendor {
        svc.create_vendor(VendorCreate {
            name: "Taco Cart".into(),
            description: None,
        })
        .await
        .unwrap()
    }

    fn schedule_create(vendor_id: &str, day_of_week: i16) -> ScheduleCreate {
        ScheduleCreate {
            vendor_id: vendor_id.to_string(),
            location_name: "Odeonsplatz".into(),
            address: "Odeonsplatz, Munich".into(),
            latitude: 48.1427,
            longitude: 11.5770,
            day_of_week,
            start_time: "12:00".into(),
            end_time: "15:00".into(),
            special_event: None,
        }
    }

    #[tokio::test]
    async fn rejects_out_of_range_coordinates() {
        let svc = service();
        let vendor = create_vendor(&svc).await;
        let mut data = schedule_create(&vendor.id, 2);
        data.latitude = 91.0;
        let err = svc.create_schedule(data).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_unpadded_or_inverted_times() {
        let svc = service();
        let vendor = create_vendor(&svc).await;

        let mut data = schedule_create(&vendor.id, 2);
        data.start_time = "9:00".into();
        assert!(matches!(
            svc.create_schedule(data).await.unwrap_err(),
            AppError::Validation(_)
        ));

        let mut data = schedule_create(&vendor.id, 2);
        data.start_time = "16:00".into();
        assert!(matches!(
            svc.create_schedule(data).await.unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn rejects_non_positive_radius() {
        let svc = service();
        let err = svc
            .find_schedules_near(48.1374, 11.5755, Some(0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn schedule_for_unknown_vendor_is_rejected() {
        let svc = service();
        let err = svc
            .create_schedule(schedule_create("999", 2))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn soft_delete_hides_from_lists_but_not_get_by_id() {
        let svc = service();
        let vendor = create_vendor(&svc).await;
        let schedule = svc
            .create_schedule(schedule_create(&vendor.id, 2))
            .await
            .unwrap();

        svc.delete_schedule(&schedule.id).await.unwrap();

        let all = svc.get_all_schedules().await.unwrap();
        assert!(all.iter().all(|s| s.id != schedule.id));

        let fetched = svc.get_schedule(&schedule.id).await.unwrap();
        assert!(!fetched.is_active);
    }

    #[tokio::test]
    async fn day_with_no_entries_yields_empty_vec() {
        let svc = service();
        // Seed schedule sits on Monday (1); ask for Saturday
        let schedules = svc.get_schedules_for_day(6).await.unwrap();
        assert!(schedules.is_empty());
    }

    #[tokio::test]
    async fn today_ordering_is_by_start_time() {
        let svc = service();
        let vendor = create_vendor(&svc).await;
        let mut late = schedule_create(&vendor.id, 4);
        late.start_time = "18:00".into();
        late.end_time = "21:00".into();
        let late = svc.create_schedule(late).await.unwrap();
        let mut early = schedule_create(&vendor.id, 4);
        early.start_time = "08:00".into();
        early.end_time = "11:00".into();
        let early = svc.create_schedule(early).await.unwrap();

        let day = svc.get_schedules_for_day(4).await.unwrap();
        let ids: Vec<&str> = day.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![early.id.as_str(), late.id.as_str()]);
    }

    #[tokio::test]
    async fn proximity_search_includes_seeded_marienplatz_schedule() {
        let svc = service();
        let hits = svc
            .find_schedules_near(48.1371, 11.5750, Some(1.0))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].schedule.location_name, "Marienplatz");
        assert!(hits[0].distance_km < 1.0);
    }

    #[tokio::test]
    async fn proximity_search_with_tiny_radius_is_empty() {
        let svc = service();
        // ~5 km away from the seeded Marienplatz schedule
        let hits = svc
            .find_schedules_near(48.1824, 11.5755, Some(0.01))
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn upsert_law_leaves_single_override_with_last_value() {
        let svc = service();
        let first = svc
            .update_availability("2", "2026-08-26", false, Some("rain".into()))
            .await
            .unwrap();
        let second = svc
            .update_availability("2", "2026-08-26T09:30:00+02:00", true, None)
            .await
            .unwrap();

        // Timestamp normalizes to the same calendar day, so the row mutates
        assert_eq!(first.id, second.id);
        let status = svc.check_availability("2", Some("2026-08-26")).await.unwrap();
        assert!(status.is_available);
        assert_eq!(status.reason, None);
    }

    #[tokio::test]
    async fn check_availability_is_idempotent_and_defaults_to_available() {
        let svc = service();
        let a = svc.check_availability("2", Some("2026-12-24")).await.unwrap();
        let b = svc.check_availability("2", Some("2026-12-24")).await.unwrap();
        assert_eq!(a, b);
        assert!(a.is_available);
        assert_eq!(a.reason, None);
    }

    #[tokio::test]
    async fn availability_for_unknown_schedule_is_not_found() {
        let svc = service();
        let err = svc.check_availability("999", None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn partial_time_update_checked_against_stored_counterpart() {
        let svc = service();
        let vendor = create_vendor(&svc).await;
        let schedule = svc
            .create_schedule(schedule_create(&vendor.id, 2))
            .await
            .unwrap();

        // end 15:00 stays; start 16:00 would invert the pair
        let err = svc
            .update_schedule(
                &schedule.id,
                ScheduleUpdate {
                    start_time: Some("16:00".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let updated = svc
            .update_schedule(
                &schedule.id,
                ScheduleUpdate {
                    start_time: Some("13:00".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.start_time, "13:00");
    }

    #[test]
    fn calendar_date_parsing_normalizes_timestamps() {
        assert_eq!(
            parse_calendar_date("2026-08-26").unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 26).unwrap()
        );
        assert_eq!(
            parse_calendar_date("2026-08-26T23:59:00Z").unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 26).unwrap()
        );
        assert!(parse_calendar_date("26.08.2026").is_err());
    }
}
