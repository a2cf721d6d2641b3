//! Booking Routes

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use notifier::{NotificationKind, Notifier};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::{Booking, BookingFilter, BookingStatus};
use tracing::warn;

use crate::{ApiError, AppState};

/// Query parameters for the bookings list
#[derive(Debug, Deserialize)]
pub struct BookingQuery {
    pub status: Option<BookingStatus>,
    pub center_id: Option<String>,
    pub vehicle_id: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

/// Response for the bookings list
#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
    pub count: usize,
}

/// Customer contact supplied at confirmation time
#[derive(Debug, Default, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Request body for booking confirmation
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfirmRequest {
    pub customer_contact: ContactInfo,
}

/// Response for booking confirmation
#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub success: bool,
    pub booking: Booking,
}

/// List bookings with optional filters
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BookingQuery>,
) -> Result<Json<BookingListResponse>, ApiError> {
    let filter = BookingFilter {
        status: params.status,
        center_id: params.center_id,
        vehicle_id: params.vehicle_id,
        limit: Some(params.limit.min(500)),
    };
    let bookings = state.store.list_bookings(&filter)?;

    Ok(Json(BookingListResponse {
        count: bookings.len(),
        bookings,
    }))
}

/// Confirm a provisional booking.
///
/// Only `provisional -> confirmed` is legal here; anything else comes back
/// as a conflict with the booking untouched. The confirmation notification
/// is fire-and-forget: its failure never unwinds the confirmation.
pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
    Json(_request): Json<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>, ApiError> {
    let now = Utc::now();
    let booking = state
        .store
        .transition_booking(&booking_id, BookingStatus::Confirmed, now)?;

    let notifier = Notifier::new(&state.store);
    if let Err(e) = notifier.send(&booking_id, NotificationKind::BookingConfirmation, now) {
        warn!("Confirmation notification for {} failed: {}", booking_id, e);
    }

    Ok(Json(ConfirmResponse {
        success: true,
        booking,
    }))
}
