//! Scheduling Engine
//!
//! Assigns flagged vehicles to service-center appointment slots under
//! capacity and priority constraints: priority scoring, slot search within
//! operating hours, optional technician matching, and the batch allocator
//! that ties them together.

mod allocator;
mod config;
mod priority;
mod slots;
mod technician;

pub use allocator::{BatchAllocator, BatchOutcome, BookingSummary, FailureReason, ScheduleFailure};
pub use config::{SchedulingConfig, TierScores};
pub use priority::PriorityScorer;
pub use slots::{DateRange, SlotFinder};
pub use technician::TechnicianMatcher;

use chrono::{DateTime, Utc};
use storage::StoreError;
use thiserror::Error;

/// Scheduling errors
#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("invalid date range: start {start} is not before end {end}")]
    InvalidDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
