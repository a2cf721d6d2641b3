//! Notification Log Route

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::NotificationRecord;

use crate::{ApiError, AppState};

/// Query parameters for the notification log
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    pub booking_id: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Response for the notification log
#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationRecord>,
    pub count: usize,
}

/// Sent notifications, newest first
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NotificationQuery>,
) -> Result<Json<NotificationListResponse>, ApiError> {
    let notifications = state
        .store
        .list_notifications(params.booking_id.as_deref(), params.limit.min(500))?;

    Ok(Json(NotificationListResponse {
        count: notifications.len(),
        notifications,
    }))
}
