//! Geo-proximity engine
//!
//! Great-circle distance via the haversine formula and radius filtering over
//! schedule candidates. Results are sorted ascending by distance; ties keep
//! the candidate input order (stable sort), which is acceptable since the
//! formula itself guarantees nothing about exact ties.

use std::cmp::Ordering;

use shared::models::{Schedule, ScheduleWithDistance};

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Search radius used when the caller does not supply one
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Great-circle distance in kilometers between two (lat, lon) points
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Keep candidates within `radius_km` of the query point, attach the computed
/// distance, and sort ascending by distance. Empty input or no hits yield an
/// empty vec, never an error.
pub fn filter_by_radius(
    candidates: Vec<Schedule>,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
) -> Vec<ScheduleWithDistance> {
    let mut hits: Vec<ScheduleWithDistance> = candidates
        .into_iter()
        .filter_map(|schedule| {
            let distance_km = haversine_km(latitude, longitude, schedule.latitude, schedule.longitude);
            (distance_km <= radius_km).then_some(ScheduleWithDistance {
                schedule,
                distance_km,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
    });
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule_at(id: &str, latitude: f64, longitude: f64) -> Schedule {
        Schedule {
            id: id.to_string(),
            vendor_id: "1".into(),
            location_name: "spot".into(),
            address: "somewhere".into(),
            latitude,
            longitude,
            day_of_week: 1,
            start_time: "11:00".into(),
            end_time: "14:00".into(),
            is_active: true,
            special_event: None,
        }
    }

    #[test]
    fn same_point_distance_is_zero() {
        let d = haversine_km(48.1374, 11.5755, 48.1374, 11.5755);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_km(48.1374, 11.5755, 52.5200, 13.4050);
        let ba = haversine_km(52.5200, 13.4050, 48.1374, 11.5755);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn munich_to_berlin_is_roughly_500km() {
        let d = haversine_km(48.1374, 11.5755, 52.5200, 13.4050);
        assert!((d - 504.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn marienplatz_query_within_one_km() {
        // Vendor at Marienplatz, query from ~50m away
        let hits = filter_by_radius(
            vec![schedule_at("1", 48.1374, 11.5755)],
            48.1371,
            11.5750,
            1.0,
        );
        assert_eq!(hits.len(), 1);
        assert!(hits[0].distance_km < 1.0);
    }

    #[test]
    fn tiny_radius_excludes_distant_point() {
        // ~5 km north of the query point
        let hits = filter_by_radius(
            vec![schedule_at("1", 48.1824, 11.5755)],
            48.1374,
            11.5755,
            0.01,
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn same_coordinates_included_for_any_radius() {
        let hits = filter_by_radius(
            vec![schedule_at("1", 48.1374, 11.5755)],
            48.1374,
            11.5755,
            0.0,
        );
        assert_eq!(hits.len(), 1);
        assert!(hits[0].distance_km.abs() < 1e-9);
    }

    #[test]
    fn results_sorted_ascending_with_stable_ties() {
        let hits = filter_by_radius(
            vec![
                schedule_at("far", 48.20, 11.5755),
                schedule_at("tie-a", 48.15, 11.5755),
                schedule_at("tie-b", 48.15, 11.5755),
                schedule_at("near", 48.14, 11.5755),
            ],
            48.1374,
            11.5755,
            50.0,
        );
        let ids: Vec<&str> = hits.iter().map(|h| h.schedule.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "tie-a", "tie-b", "far"]);
    }
}
