//! Telemetry Ingestion
//!
//! Validates incoming telemetry readings, persists them, and raises
//! maintenance flags when threshold rules fire. The background simulator
//! produces synthetic readings through the same path as real data.

mod flagging;
mod ingest;
mod simulator;
mod validate;

pub use flagging::{FlagCandidate, FlagPolicy};
pub use ingest::{IngestOutcome, TelemetryIngestor, TelemetryReading};
pub use simulator::{Simulator, SimulatorConfig};
pub use validate::validate_reading;

use storage::StoreError;
use thiserror::Error;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown vehicle: {0}")]
    UnknownVehicle(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
