//! Fleet Storage Layer
//!
//! Record types and the `FleetStore` repository shared by the scheduling
//! core, the telemetry ingestion path, and the API surface. The store keeps
//! everything behind a single mutex so the capacity check and the booking
//! insert form one atomic unit.

mod records;
mod store;

pub mod seed;

pub use records::{
    Booking, BookingStatus, BrakeCondition, CustomerTier, MaintenanceFlag, NewBooking, NewFlag,
    NotificationRecord, ServiceCenter, SeverityLevel, Technician, TelemetryRecord, Vehicle,
};
pub use store::{BookingFilter, FleetStore};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("no bay capacity left at {center_id} for slot starting {slot_start}")]
    SlotCapacityExhausted {
        center_id: String,
        slot_start: chrono::DateTime<chrono::Utc>,
    },

    #[error("vehicle {0} already has an open booking")]
    OpenBookingExists(String),

    #[error("maintenance flag {0} is already scheduled")]
    FlagAlreadyScheduled(u64),

    #[error("invalid booking transition: {from} -> {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("store lock error: {0}")]
    Lock(String),
}
