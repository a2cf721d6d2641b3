//! Slot Query Route

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use scheduling::{DateRange, SlotFinder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{ApiError, AppState};

/// Query parameters for the slots endpoint
#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub center_id: String,
    /// Day to search, YYYY-MM-DD
    pub date: NaiveDate,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Response for the slots endpoint
#[derive(Debug, Serialize)]
pub struct SlotResponse {
    pub center_id: String,
    pub date: NaiveDate,
    pub available_slots: Vec<DateTime<Utc>>,
    pub total_slots: usize,
}

/// Open slots at one center for one day
pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SlotQuery>,
) -> Result<Json<SlotResponse>, ApiError> {
    let center = state
        .store
        .get_center(&params.center_id)?
        .ok_or_else(|| ApiError::NotFound(format!("service center not found: {}", params.center_id)))?;

    let start = params
        .date
        .and_hms_opt(0, 0, 0)
        .map(|n| n.and_utc())
        .ok_or_else(|| ApiError::BadRequest("invalid date".to_string()))?;
    let range = DateRange {
        start,
        end: start + chrono::Duration::days(1),
    };

    let finder = SlotFinder::new(&state.store, &state.scheduling);
    let slots = finder.find_slots(&center, &range, Utc::now(), params.limit.min(500))?;

    Ok(Json(SlotResponse {
        center_id: params.center_id,
        date: params.date,
        total_slots: slots.len(),
        available_slots: slots,
    }))
}
