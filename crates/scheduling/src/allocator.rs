//! Batch Allocator
//!
//! Orchestrates one scheduling run: scores flagged vehicles, serves them in
//! descending priority, walks service centers in randomized order, and
//! commits provisional bookings through the store's atomic commit. One
//! vehicle's failure never aborts the batch.

use crate::{
    DateRange, PriorityScorer, SchedulingConfig, SchedulingError, SlotFinder, TechnicianMatcher,
};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::fmt;
use storage::{Booking, FleetStore, MaintenanceFlag, NewBooking, SeverityLevel, StoreError, Vehicle};
use tracing::{debug, info, warn};

/// Why a vehicle could not be scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureReason {
    #[serde(rename = "vehicle not found")]
    VehicleNotFound,
    #[serde(rename = "not flagged")]
    NotFlagged,
    #[serde(rename = "no capacity")]
    NoCapacity,
    #[serde(rename = "open booking already exists")]
    AlreadyBooked,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureReason::VehicleNotFound => "vehicle not found",
            FailureReason::NotFlagged => "not flagged",
            FailureReason::NoCapacity => "no capacity",
            FailureReason::AlreadyBooked => "open booking already exists",
        };
        f.write_str(s)
    }
}

/// Per-vehicle scheduling failure
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleFailure {
    pub vehicle_id: String,
    pub reason: FailureReason,
}

/// Committed booking, trimmed for batch output
#[derive(Debug, Clone, Serialize)]
pub struct BookingSummary {
    pub booking_id: String,
    pub vehicle_id: String,
    pub center_id: String,
    pub tech_id: Option<String>,
    pub slot_start: DateTime<Utc>,
    pub slot_end: DateTime<Utc>,
    pub priority_score: f64,
    pub severity_level: SeverityLevel,
}

impl From<&Booking> for BookingSummary {
    fn from(b: &Booking) -> Self {
        Self {
            booking_id: b.booking_id.clone(),
            vehicle_id: b.vehicle_id.clone(),
            center_id: b.center_id.clone(),
            tech_id: b.tech_id.clone(),
            slot_start: b.slot_start,
            slot_end: b.slot_end,
            priority_score: b.priority_score,
            severity_level: b.severity_level,
        }
    }
}

/// Full accounting for one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub scheduled: Vec<BookingSummary>,
    pub failed: Vec<ScheduleFailure>,
}

struct Candidate {
    vehicle: Vehicle,
    flag: MaintenanceFlag,
    score: f64,
}

enum Allocation {
    Booked(Booking),
    AlreadyBooked,
    Exhausted,
}

/// Batch scheduling engine
pub struct BatchAllocator<'a> {
    store: &'a FleetStore,
    config: SchedulingConfig,
    scorer: PriorityScorer,
    rng: StdRng,
}

impl<'a> BatchAllocator<'a> {
    /// Build an allocator; the center-shuffle rng comes from
    /// `config.rng_seed` when set, OS entropy otherwise.
    pub fn new(store: &'a FleetStore, config: SchedulingConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let scorer = PriorityScorer::new(config.clone());
        Self {
            store,
            config,
            scorer,
            rng,
        }
    }

    /// Schedule a batch of vehicles within the requested window.
    ///
    /// Returns the full accounting: every input vehicle ends up either in
    /// `scheduled` or in `failed` with a reason.
    pub fn schedule_batch(
        &mut self,
        vehicle_ids: &[String],
        range: &DateRange,
        now: DateTime<Utc>,
    ) -> Result<BatchOutcome, SchedulingError> {
        if range.end <= range.start {
            return Err(SchedulingError::InvalidDateRange {
                start: range.start,
                end: range.end,
            });
        }

        let mut failed = Vec::new();
        let mut queue = Vec::new();

        for vehicle_id in vehicle_ids {
            let Some(vehicle) = self.store.get_vehicle(vehicle_id)? else {
                failed.push(ScheduleFailure {
                    vehicle_id: vehicle_id.clone(),
                    reason: FailureReason::VehicleNotFound,
                });
                continue;
            };
            let Some(flag) = self.store.latest_unscheduled_flag(vehicle_id)? else {
                failed.push(ScheduleFailure {
                    vehicle_id: vehicle_id.clone(),
                    reason: FailureReason::NotFlagged,
                });
                continue;
            };

            let wait_days = PriorityScorer::wait_days(flag.flagged_at, now);
            let score = self.scorer.score(
                flag.severity_score,
                vehicle.customer_tier,
                self.config.default_proximity,
                wait_days,
            );
            queue.push(Candidate {
                vehicle,
                flag,
                score,
            });
        }

        // highest urgency first; id tie-break keeps runs deterministic
        queue.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.vehicle.vehicle_id.cmp(&b.vehicle.vehicle_id))
        });

        let mut scheduled = Vec::new();
        for candidate in &queue {
            match self.allocate_one(candidate, range, now)? {
                Allocation::Booked(booking) => scheduled.push(BookingSummary::from(&booking)),
                Allocation::AlreadyBooked => failed.push(ScheduleFailure {
                    vehicle_id: candidate.vehicle.vehicle_id.clone(),
                    reason: FailureReason::AlreadyBooked,
                }),
                Allocation::Exhausted => failed.push(ScheduleFailure {
                    vehicle_id: candidate.vehicle.vehicle_id.clone(),
                    reason: FailureReason::NoCapacity,
                }),
            }
        }

        info!(
            "Batch complete: {} scheduled, {} failed",
            scheduled.len(),
            failed.len()
        );
        Ok(BatchOutcome { scheduled, failed })
    }

    fn allocate_one(
        &mut self,
        candidate: &Candidate,
        range: &DateRange,
        now: DateTime<Utc>,
    ) -> Result<Allocation, SchedulingError> {
        let mut centers = self.store.list_active_centers()?;
        if centers.is_empty() {
            warn!("No active service centers");
            return Ok(Allocation::Exhausted);
        }
        // randomized order spreads load across centers; deterministic
        // center-first iteration would systematically overload one of them
        centers.shuffle(&mut self.rng);

        let finder = SlotFinder::new(self.store, &self.config);
        let matcher = TechnicianMatcher::new(self.store);
        let severity_level = SeverityLevel::from_score(candidate.flag.severity_score);
        let slot_length = Duration::minutes(self.config.slot_duration_minutes);
        let attempts = self.config.commit_retries.max(1) as usize;

        for center in &centers {
            for slot_start in finder.find_slots(center, range, now, attempts)? {
                let slot_end = slot_start + slot_length;
                let tech = matcher.find_technician(&center.center_id, slot_start, slot_end)?;
                if self.config.require_technician && tech.is_none() {
                    continue;
                }

                let new = NewBooking {
                    vehicle_id: candidate.vehicle.vehicle_id.clone(),
                    center_id: center.center_id.clone(),
                    tech_id: tech.map(|t| t.tech_id),
                    slot_start,
                    slot_end,
                    priority_score: candidate.score,
                    severity_level,
                    service_type: "general_inspection".to_string(),
                    created_at: now,
                };
                match self.store.commit_booking(new, candidate.flag.flag_id) {
                    Ok(booking) => {
                        debug!(
                            "Scheduled {} at {} slot {}",
                            booking.vehicle_id, booking.center_id, booking.slot_start
                        );
                        return Ok(Allocation::Booked(booking));
                    }
                    // lost a capacity race, try the next candidate slot
                    Err(StoreError::SlotCapacityExhausted { .. }) => {
                        debug!(
                            "Slot {} at {} taken under us, retrying",
                            slot_start, center.center_id
                        );
                        continue;
                    }
                    Err(StoreError::FlagAlreadyScheduled(_))
                    | Err(StoreError::OpenBookingExists(_)) => {
                        return Ok(Allocation::AlreadyBooked);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        Ok(Allocation::Exhausted)
    }
}
