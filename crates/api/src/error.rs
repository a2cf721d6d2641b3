//! API error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use scheduling::SchedulingError;
use serde_json::json;
use storage::StoreError;
use telemetry_ingest::IngestError;
use thiserror::Error;

/// Errors surfaced to API callers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StoreError::InvalidTransition { .. }
            | StoreError::SlotCapacityExhausted { .. }
            | StoreError::OpenBookingExists(_)
            | StoreError::FlagAlreadyScheduled(_) => ApiError::Conflict(err.to_string()),
            StoreError::Lock(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<SchedulingError> for ApiError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::InvalidDateRange { .. } => ApiError::BadRequest(err.to_string()),
            SchedulingError::Store(store) => store.into(),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::OutOfRange { .. } | IngestError::MissingField(_) => {
                ApiError::BadRequest(err.to_string())
            }
            IngestError::UnknownVehicle(_) => ApiError::NotFound(err.to_string()),
            IngestError::Store(store) => store.into(),
        }
    }
}
