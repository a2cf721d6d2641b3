//! Telemetry Ingest Route

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use telemetry_ingest::{TelemetryIngestor, TelemetryReading};

use crate::{ApiError, AppState};

/// Response for telemetry ingestion
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub vehicle_id: String,
    pub flagged_for_maintenance: bool,
    pub timestamp: DateTime<Utc>,
}

/// Ingest a single telemetry reading
pub async fn ingest_telemetry(
    State(state): State<Arc<AppState>>,
    Json(reading): Json<TelemetryReading>,
) -> Result<Json<IngestResponse>, ApiError> {
    let ingestor = TelemetryIngestor::new(&state.store, state.flag_policy.clone());
    let outcome = ingestor.ingest(reading, Utc::now())?;

    Ok(Json(IngestResponse {
        success: true,
        vehicle_id: outcome.vehicle_id,
        flagged_for_maintenance: outcome.flagged,
        timestamp: outcome.timestamp,
    }))
}
