//! Telemetry Ingestor

use crate::{validate_reading, FlagPolicy, IngestError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storage::{FleetStore, NewFlag, TelemetryRecord};
use tracing::{debug, info};

/// One telemetry reading as submitted by a producer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryReading {
    pub vehicle_id: String,
    /// Defaults to the ingestion instant when absent
    pub timestamp: Option<DateTime<Utc>>,
    pub mileage: u32,
    pub engine_load: f64,
    pub oil_quality: f64,
    pub battery_percent: f64,
    pub brake_condition: storage::BrakeCondition,
    pub brake_temp: f64,
    pub tire_pressure: f64,
    pub fuel_consumption: f64,
}

/// What happened to one ingested reading
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub vehicle_id: String,
    pub timestamp: DateTime<Utc>,
    pub flagged: bool,
}

/// Validates readings, persists them, and raises maintenance flags
pub struct TelemetryIngestor<'a> {
    store: &'a FleetStore,
    policy: FlagPolicy,
}

impl<'a> TelemetryIngestor<'a> {
    pub fn new(store: &'a FleetStore, policy: FlagPolicy) -> Self {
        Self { store, policy }
    }

    /// Ingest one reading.
    ///
    /// At most one open flag exists per vehicle: a reading for an
    /// already-flagged vehicle is stored but raises nothing new.
    pub fn ingest(
        &self,
        reading: TelemetryReading,
        now: DateTime<Utc>,
    ) -> Result<IngestOutcome, IngestError> {
        validate_reading(&reading)?;

        if self.store.get_vehicle(&reading.vehicle_id)?.is_none() {
            return Err(IngestError::UnknownVehicle(reading.vehicle_id));
        }

        let timestamp = reading.timestamp.unwrap_or(now);
        self.store.insert_telemetry(TelemetryRecord {
            vehicle_id: reading.vehicle_id.clone(),
            timestamp,
            mileage: reading.mileage,
            engine_load: reading.engine_load,
            oil_quality: reading.oil_quality,
            battery_percent: reading.battery_percent,
            brake_condition: reading.brake_condition,
            brake_temp: reading.brake_temp,
            tire_pressure: reading.tire_pressure,
            fuel_consumption: reading.fuel_consumption,
        })?;
        debug!("Telemetry ingested for {}", reading.vehicle_id);

        let already_flagged = self
            .store
            .latest_unscheduled_flag(&reading.vehicle_id)?
            .is_some();
        let mut flagged = false;
        if !already_flagged {
            if let Some(candidate) = self.policy.evaluate(&reading) {
                info!(
                    "Flagging {} for maintenance (severity {:.0}: {})",
                    reading.vehicle_id,
                    candidate.severity_score,
                    candidate.risk_factors.join(", ")
                );
                self.store.insert_flag(NewFlag {
                    vehicle_id: reading.vehicle_id.clone(),
                    flagged_at: now,
                    confidence: candidate.confidence,
                    risk_factors: candidate.risk_factors,
                    severity_score: candidate.severity_score,
                })?;
                flagged = true;
            }
        }

        Ok(IngestOutcome {
            vehicle_id: reading.vehicle_id,
            timestamp,
            flagged,
        })
    }
}
