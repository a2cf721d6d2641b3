//! Batch Scheduling Route

use axum::{extract::State, Json};
use chrono::{Duration, NaiveDate, Utc};
use scheduling::{BatchAllocator, BatchOutcome, DateRange};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::{ApiError, AppState};

/// Requested scheduling window, YYYY-MM-DD, end exclusive
#[derive(Debug, Deserialize)]
pub struct DateRangeBody {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Request body for batch scheduling
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BatchRequest {
    /// Vehicles to schedule; empty means every currently flagged vehicle
    pub vehicles: Vec<String>,
    /// Defaults to the next seven days when absent
    pub preferred_date_range: Option<DateRangeBody>,
}

/// Response for batch scheduling
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub scheduled_count: usize,
    pub failed_count: usize,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

/// Schedule a batch of flagged vehicles
pub async fn schedule_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    let vehicles = if request.vehicles.is_empty() {
        let mut ids: Vec<String> = state
            .store
            .list_unscheduled_flags()?
            .into_iter()
            .map(|f| f.vehicle_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    } else {
        request.vehicles
    };

    if vehicles.is_empty() {
        return Ok(Json(BatchResponse {
            success: true,
            scheduled_count: 0,
            failed_count: 0,
            outcome: BatchOutcome {
                scheduled: Vec::new(),
                failed: Vec::new(),
            },
        }));
    }

    let now = Utc::now();
    let range = match request.preferred_date_range {
        Some(body) => {
            let start = body
                .start
                .and_hms_opt(0, 0, 0)
                .map(|n| n.and_utc())
                .ok_or_else(|| ApiError::BadRequest("invalid start date".to_string()))?;
            let end = body
                .end
                .and_hms_opt(0, 0, 0)
                .map(|n| n.and_utc())
                .ok_or_else(|| ApiError::BadRequest("invalid end date".to_string()))?;
            DateRange { start, end }
        }
        None => DateRange {
            start: now,
            end: now + Duration::days(7),
        },
    };

    info!(
        "Batch scheduling request: {} vehicles, {} to {}",
        vehicles.len(),
        range.start,
        range.end
    );

    let mut allocator = BatchAllocator::new(&state.store, state.scheduling.clone());
    let outcome = allocator.schedule_batch(&vehicles, &range, now)?;

    Ok(Json(BatchResponse {
        success: true,
        scheduled_count: outcome.scheduled.len(),
        failed_count: outcome.failed.len(),
        outcome,
    }))
}
