//! FleetStore Implementation

use crate::records::*;
use crate::StoreError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

/// Filters for booking queries
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub center_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Default)]
struct StoreInner {
    vehicles: HashMap<String, Vehicle>,
    centers: HashMap<String, ServiceCenter>,
    technicians: HashMap<String, Technician>,
    telemetry: Vec<TelemetryRecord>,
    flags: Vec<MaintenanceFlag>,
    bookings: HashMap<String, Booking>,
    notifications: Vec<NotificationRecord>,
    next_flag_id: u64,
}

/// In-memory fleet repository.
///
/// All state sits behind one mutex so that `commit_booking` can run its
/// capacity check, duplicate-open check, booking insert, and flag flip as a
/// single critical section. Readers take the same lock; no lock is held
/// across more than one vehicle's processing.
pub struct FleetStore {
    inner: Mutex<StoreInner>,
}

impl FleetStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        info!("Creating in-memory fleet store");
        Self {
            inner: Mutex::new(StoreInner {
                next_flag_id: 1,
                ..Default::default()
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreInner>, StoreError> {
        self.inner.lock().map_err(|e| StoreError::Lock(e.to_string()))
    }

    // --- reference data ---

    /// Insert or replace a service center
    pub fn insert_center(&self, center: ServiceCenter) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.centers.insert(center.center_id.clone(), center);
        Ok(())
    }

    /// Insert or replace a technician
    pub fn insert_technician(&self, tech: Technician) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.technicians.insert(tech.tech_id.clone(), tech);
        Ok(())
    }

    /// Insert or replace a vehicle
    pub fn upsert_vehicle(&self, vehicle: Vehicle) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.vehicles.insert(vehicle.vehicle_id.clone(), vehicle);
        Ok(())
    }

    /// Look up a vehicle by id
    pub fn get_vehicle(&self, vehicle_id: &str) -> Result<Option<Vehicle>, StoreError> {
        Ok(self.lock()?.vehicles.get(vehicle_id).cloned())
    }

    /// All vehicles, ordered by id
    pub fn list_vehicles(&self) -> Result<Vec<Vehicle>, StoreError> {
        let inner = self.lock()?;
        let mut vehicles: Vec<_> = inner.vehicles.values().cloned().collect();
        vehicles.sort_by(|a, b| a.vehicle_id.cmp(&b.vehicle_id));
        Ok(vehicles)
    }

    /// Look up a service center by id
    pub fn get_center(&self, center_id: &str) -> Result<Option<ServiceCenter>, StoreError> {
        Ok(self.lock()?.centers.get(center_id).cloned())
    }

    /// All active service centers
    pub fn list_active_centers(&self) -> Result<Vec<ServiceCenter>, StoreError> {
        let inner = self.lock()?;
        let mut centers: Vec<_> = inner
            .centers
            .values()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        centers.sort_by(|a, b| a.center_id.cmp(&b.center_id));
        Ok(centers)
    }

    /// Technicians employed at a center
    pub fn technicians_at(&self, center_id: &str) -> Result<Vec<Technician>, StoreError> {
        let inner = self.lock()?;
        let mut techs: Vec<_> = inner
            .technicians
            .values()
            .filter(|t| t.center_id == center_id)
            .cloned()
            .collect();
        techs.sort_by(|a, b| a.tech_id.cmp(&b.tech_id));
        Ok(techs)
    }

    // --- telemetry ---

    /// Append a telemetry record
    pub fn insert_telemetry(&self, record: TelemetryRecord) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.telemetry.push(record);
        Ok(())
    }

    /// Most recent telemetry for a vehicle, newest first
    pub fn recent_telemetry(
        &self,
        vehicle_id: &str,
        limit: usize,
    ) -> Result<Vec<TelemetryRecord>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .telemetry
            .iter()
            .rev()
            .filter(|t| t.vehicle_id == vehicle_id)
            .take(limit)
            .cloned()
            .collect())
    }

    // --- maintenance flags ---

    /// Insert a flag, assigning its id
    pub fn insert_flag(&self, new: NewFlag) -> Result<MaintenanceFlag, StoreError> {
        let mut inner = self.lock()?;
        let flag_id = inner.next_flag_id;
        inner.next_flag_id += 1;

        let flag = MaintenanceFlag {
            flag_id,
            vehicle_id: new.vehicle_id,
            flagged_at: new.flagged_at,
            confidence: new.confidence,
            risk_factors: new.risk_factors,
            severity_score: new.severity_score,
            is_scheduled: false,
            scheduled_booking_id: None,
            resolved_at: None,
        };
        debug!(
            "Flag {} raised for {} (severity {:.1})",
            flag.flag_id, flag.vehicle_id, flag.severity_score
        );
        inner.flags.push(flag.clone());
        Ok(flag)
    }

    /// Latest unscheduled flag for a vehicle, if any
    pub fn latest_unscheduled_flag(
        &self,
        vehicle_id: &str,
    ) -> Result<Option<MaintenanceFlag>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .flags
            .iter()
            .filter(|f| f.vehicle_id == vehicle_id && !f.is_scheduled)
            .max_by_key(|f| f.flagged_at)
            .cloned())
    }

    /// All unscheduled flags
    pub fn list_unscheduled_flags(&self) -> Result<Vec<MaintenanceFlag>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .flags
            .iter()
            .filter(|f| !f.is_scheduled)
            .cloned()
            .collect())
    }

    // --- bookings ---

    /// Count non-cancelled bookings at a center overlapping [start, end)
    pub fn count_overlapping(
        &self,
        center_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        let inner = self.lock()?;
        Ok(count_overlapping_locked(&inner, center_id, start, end))
    }

    /// Whether a technician has an open booking overlapping [start, end)
    pub fn technician_busy(
        &self,
        tech_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let inner = self.lock()?;
        Ok(inner.bookings.values().any(|b| {
            b.tech_id.as_deref() == Some(tech_id)
                && b.status.is_open()
                && b.slot_start < end
                && b.slot_end > start
        }))
    }

    /// Atomically commit a provisional booking and mark its flag scheduled.
    ///
    /// Re-checks bay capacity and the one-open-booking-per-vehicle rule under
    /// the lock, so two racing callers cannot both pass the capacity check.
    /// On any failure nothing is written.
    pub fn commit_booking(&self, new: NewBooking, flag_id: u64) -> Result<Booking, StoreError> {
        let mut inner = self.lock()?;

        let capacity = inner
            .centers
            .get(&new.center_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "service center",
                id: new.center_id.clone(),
            })?
            .capacity_bays;

        let flag_pos = inner
            .flags
            .iter()
            .position(|f| f.flag_id == flag_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "maintenance flag",
                id: flag_id.to_string(),
            })?;
        if inner.flags[flag_pos].is_scheduled {
            return Err(StoreError::FlagAlreadyScheduled(flag_id));
        }

        if inner
            .bookings
            .values()
            .any(|b| b.vehicle_id == new.vehicle_id && b.status.is_open())
        {
            return Err(StoreError::OpenBookingExists(new.vehicle_id.clone()));
        }

        let booked = count_overlapping_locked(&inner, &new.center_id, new.slot_start, new.slot_end);
        if booked >= capacity as usize {
            return Err(StoreError::SlotCapacityExhausted {
                center_id: new.center_id.clone(),
                slot_start: new.slot_start,
            });
        }

        let booking_id = generate_booking_id();
        let booking = Booking {
            booking_id: booking_id.clone(),
            vehicle_id: new.vehicle_id,
            center_id: new.center_id,
            tech_id: new.tech_id,
            slot_start: new.slot_start,
            slot_end: new.slot_end,
            status: BookingStatus::Provisional,
            priority_score: new.priority_score,
            severity_level: new.severity_level,
            service_type: new.service_type,
            notes: None,
            created_at: new.created_at,
            confirmed_at: None,
            completed_at: None,
        };

        inner.flags[flag_pos].is_scheduled = true;
        inner.flags[flag_pos].scheduled_booking_id = Some(booking_id.clone());
        inner.bookings.insert(booking_id.clone(), booking.clone());

        info!(
            "Booking {} committed: {} at {} ({})",
            booking_id, booking.vehicle_id, booking.center_id, booking.slot_start
        );
        Ok(booking)
    }

    /// Look up a booking by id
    pub fn get_booking(&self, booking_id: &str) -> Result<Option<Booking>, StoreError> {
        Ok(self.lock()?.bookings.get(booking_id).cloned())
    }

    /// Advance a booking along the legal status graph.
    ///
    /// Confirmation and completion stamp their timestamps. An illegal edge
    /// leaves the booking unchanged and returns `InvalidTransition`.
    pub fn transition_booking(
        &self,
        booking_id: &str,
        target: BookingStatus,
        at: DateTime<Utc>,
    ) -> Result<Booking, StoreError> {
        let mut inner = self.lock()?;
        let booking = inner
            .bookings
            .get_mut(booking_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "booking",
                id: booking_id.to_string(),
            })?;

        if !booking.status.can_transition(target) {
            return Err(StoreError::InvalidTransition {
                from: booking.status,
                to: target,
            });
        }

        booking.status = target;
        match target {
            BookingStatus::Confirmed => booking.confirmed_at = Some(at),
            BookingStatus::Completed => booking.completed_at = Some(at),
            _ => {}
        }
        info!("Booking {} -> {}", booking_id, target);
        Ok(booking.clone())
    }

    /// List bookings matching the filter, latest slot first
    pub fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError> {
        let inner = self.lock()?;
        let mut bookings: Vec<_> = inner
            .bookings
            .values()
            .filter(|b| filter.status.map_or(true, |s| b.status == s))
            .filter(|b| {
                filter
                    .center_id
                    .as_deref()
                    .map_or(true, |c| b.center_id == c)
            })
            .filter(|b| {
                filter
                    .vehicle_id
                    .as_deref()
                    .map_or(true, |v| b.vehicle_id == v)
            })
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.slot_start.cmp(&a.slot_start));
        bookings.truncate(filter.limit.unwrap_or(100));
        Ok(bookings)
    }

    // --- notifications ---

    /// Append a notification log entry
    pub fn insert_notification(&self, record: NotificationRecord) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.notifications.push(record);
        Ok(())
    }

    /// Notification log, newest first, optionally filtered by booking
    pub fn list_notifications(
        &self,
        booking_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<NotificationRecord>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .notifications
            .iter()
            .rev()
            .filter(|n| booking_id.map_or(true, |id| n.booking_id == id))
            .take(limit)
            .cloned()
            .collect())
    }

    // --- counts for health reporting ---

    pub fn vehicle_count(&self) -> usize {
        self.lock().map(|i| i.vehicles.len()).unwrap_or(0)
    }

    pub fn booking_count(&self) -> usize {
        self.lock().map(|i| i.bookings.len()).unwrap_or(0)
    }

    pub fn telemetry_count(&self) -> usize {
        self.lock().map(|i| i.telemetry.len()).unwrap_or(0)
    }

    pub fn open_flag_count(&self) -> usize {
        self.lock()
            .map(|i| i.flags.iter().filter(|f| !f.is_scheduled).count())
            .unwrap_or(0)
    }
}

impl Default for FleetStore {
    fn default() -> Self {
        Self::new()
    }
}

fn count_overlapping_locked(
    inner: &StoreInner,
    center_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> usize {
    inner
        .bookings
        .values()
        .filter(|b| {
            b.center_id == center_id
                && b.status.counts_against_capacity()
                && b.slot_start < end
                && b.slot_end > start
        })
        .count()
}

fn generate_booking_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("BKG-{}", hex[..8].to_uppercase())
}
