//! Slot Finder
//!
//! Enumerates open appointment slots at one service center, respecting
//! operating hours and existing bookings. Purely a query; never mutates
//! store state.

use crate::{SchedulingConfig, SchedulingError};
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use storage::{FleetStore, ServiceCenter};
use tracing::warn;

/// Requested scheduling window, end exclusive
#[derive(Debug, Clone, Copy)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Finds open slots for a center within a date range
pub struct SlotFinder<'a> {
    store: &'a FleetStore,
    config: &'a SchedulingConfig,
}

impl<'a> SlotFinder<'a> {
    pub fn new(store: &'a FleetStore, config: &'a SchedulingConfig) -> Self {
        Self { store, config }
    }

    /// Candidate slot start times, earliest first.
    ///
    /// Walks the slot grid from `max(range.start, now)`; candidates outside
    /// the center's operating window jump straight to the next opening.
    /// Emits a candidate when fewer than `capacity_bays` non-cancelled
    /// bookings overlap it. Stops at `range.end` or after `limit` results.
    pub fn find_slots(
        &self,
        center: &ServiceCenter,
        range: &DateRange,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<DateTime<Utc>>, SchedulingError> {
        if center.open_hour >= center.close_hour || center.close_hour > 24 {
            warn!(
                "Center {} has unusable operating hours {}-{}",
                center.center_id, center.open_hour, center.close_hour
            );
            return Ok(Vec::new());
        }

        let step = Duration::minutes(self.config.slot_duration_minutes);
        let mut cursor = align_to_grid(range.start.max(now), step);
        let mut slots = Vec::new();

        while cursor < range.end && slots.len() < limit {
            let hour = cursor.hour();
            if hour < center.open_hour {
                cursor = opening(cursor.date_naive(), center.open_hour);
                continue;
            }
            if hour >= center.close_hour {
                cursor = opening(cursor.date_naive() + Days::new(1), center.open_hour);
                continue;
            }

            let slot_end = cursor + step;
            let booked = self
                .store
                .count_overlapping(&center.center_id, cursor, slot_end)?;
            if booked < center.capacity_bays as usize {
                slots.push(cursor);
            }
            cursor += step;
        }

        Ok(slots)
    }
}

/// Round up to the next multiple of `step` since midnight UTC
fn align_to_grid(t: DateTime<Utc>, step: Duration) -> DateTime<Utc> {
    let midnight = opening(t.date_naive(), 0);
    let elapsed = (t - midnight).num_seconds();
    let step_secs = step.num_seconds();
    let slots = (elapsed + step_secs - 1) / step_secs;
    midnight + Duration::seconds(slots * step_secs)
}

fn opening(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    // hour is validated against the operating window before use
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default();
    date.and_time(time).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use storage::{NewBooking, NewFlag, SeverityLevel};

    fn center(capacity: u32, open: u32, close: u32) -> ServiceCenter {
        ServiceCenter {
            center_id: "SC01".to_string(),
            name: "Test Center".to_string(),
            region: "north".to_string(),
            location: "Depot Road".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            capacity_bays: capacity,
            open_hour: open,
            close_hour: close,
            contact_phone: String::new(),
            is_active: true,
        }
    }

    fn day_range(day: u32) -> DateRange {
        DateRange {
            start: Utc.with_ymd_and_hms(2026, 3, day, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 3, day + 1, 0, 0, 0).unwrap(),
        }
    }

    fn book(store: &FleetStore, vehicle: &str, day: u32, hour: u32) {
        let flag = store
            .insert_flag(NewFlag {
                vehicle_id: vehicle.to_string(),
                flagged_at: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
                confidence: 0.8,
                risk_factors: vec![],
                severity_score: 50.0,
            })
            .unwrap();
        let start = Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap();
        store
            .commit_booking(
                NewBooking {
                    vehicle_id: vehicle.to_string(),
                    center_id: "SC01".to_string(),
                    tech_id: None,
                    slot_start: start,
                    slot_end: start + Duration::minutes(60),
                    priority_score: 50.0,
                    severity_level: SeverityLevel::Medium,
                    service_type: "general_inspection".to_string(),
                    created_at: start,
                },
                flag.flag_id,
            )
            .unwrap();
    }

    #[test]
    fn test_slots_stay_within_operating_hours() {
        let store = FleetStore::new();
        let center = center(2, 9, 12);
        store.insert_center(center.clone()).unwrap();
        let config = SchedulingConfig::default();
        let finder = SlotFinder::new(&store, &config);

        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let slots = finder.find_slots(&center, &day_range(2), now, 100).unwrap();

        assert_eq!(slots.len(), 3);
        for slot in &slots {
            assert!(slot.hour() >= 9 && slot.hour() < 12);
        }
    }

    #[test]
    fn test_never_emits_past_slots() {
        let store = FleetStore::new();
        let center = center(2, 8, 18);
        store.insert_center(center.clone()).unwrap();
        let config = SchedulingConfig::default();
        let finder = SlotFinder::new(&store, &config);

        // now is mid-day inside the requested range
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 13, 30, 0).unwrap();
        let slots = finder.find_slots(&center, &day_range(2), now, 100).unwrap();

        assert!(!slots.is_empty());
        for slot in &slots {
            assert!(*slot >= now);
        }
        // mid-hour now rounds up to the next grid point
        assert_eq!(slots[0], Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap());
    }

    #[test]
    fn test_range_entirely_in_past_yields_nothing() {
        let store = FleetStore::new();
        let center = center(2, 8, 18);
        store.insert_center(center.clone()).unwrap();
        let config = SchedulingConfig::default();
        let finder = SlotFinder::new(&store, &config);

        let now = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
        let slots = finder.find_slots(&center, &day_range(2), now, 100).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_full_slots_are_skipped() {
        let store = FleetStore::new();
        let center = center(1, 9, 11);
        store.insert_center(center.clone()).unwrap();
        book(&store, "V001", 2, 9);

        let config = SchedulingConfig::default();
        let finder = SlotFinder::new(&store, &config);
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let slots = finder.find_slots(&center, &day_range(2), now, 100).unwrap();

        assert_eq!(slots, vec![Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap()]);
    }

    #[test]
    fn test_rolls_over_to_next_day() {
        let store = FleetStore::new();
        let center = center(1, 9, 10);
        store.insert_center(center.clone()).unwrap();
        book(&store, "V001", 2, 9);

        let config = SchedulingConfig::default();
        let finder = SlotFinder::new(&store, &config);
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let range = DateRange {
            start: Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 3, 4, 0, 0, 0).unwrap(),
        };
        let slots = finder.find_slots(&center, &range, now, 100).unwrap();

        // day 2's only slot is taken, so the next candidate is day 3 opening
        assert_eq!(slots, vec![Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap()]);
    }

    #[test]
    fn test_limit_is_respected() {
        let store = FleetStore::new();
        let center = center(5, 8, 18);
        store.insert_center(center.clone()).unwrap();
        let config = SchedulingConfig::default();
        let finder = SlotFinder::new(&store, &config);

        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let slots = finder.find_slots(&center, &day_range(2), now, 3).unwrap();
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn test_unusable_hours_yield_nothing() {
        let store = FleetStore::new();
        let center = center(5, 18, 8);
        store.insert_center(center.clone()).unwrap();
        let config = SchedulingConfig::default();
        let finder = SlotFinder::new(&store, &config);

        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let slots = finder.find_slots(&center, &day_range(2), now, 100).unwrap();
        assert!(slots.is_empty());
    }
}
