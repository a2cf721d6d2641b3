//! Technician Matcher
//!
//! Technician assignment is an optimization, not a hard constraint: a
//! booking may proceed unnamed unless the caller's policy says otherwise.

use crate::SchedulingError;
use chrono::{DateTime, Utc};
use storage::{FleetStore, Technician};

/// Finds a free technician for a slot at a center
pub struct TechnicianMatcher<'a> {
    store: &'a FleetStore,
}

impl<'a> TechnicianMatcher<'a> {
    pub fn new(store: &'a FleetStore) -> Self {
        Self { store }
    }

    /// First available technician at the center whose open bookings do not
    /// overlap `[slot_start, slot_end)`, or `None` if all are busy.
    pub fn find_technician(
        &self,
        center_id: &str,
        slot_start: DateTime<Utc>,
        slot_end: DateTime<Utc>,
    ) -> Result<Option<Technician>, SchedulingError> {
        for tech in self
            .store
            .technicians_at(center_id)?
            .into_iter()
            .filter(|t| t.is_available)
        {
            if !self
                .store
                .technician_busy(&tech.tech_id, slot_start, slot_end)?
            {
                return Ok(Some(tech));
            }
        }
        Ok(None)
    }
}
