//! Fleet Maintenance API Server
//!
//! REST surface around the scheduling core: slot queries, batch scheduling,
//! booking confirmation, telemetry ingestion, and the notification log.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod error;
mod routes;
mod settings;

pub use error::ApiError;
pub use settings::Settings;

use scheduling::SchedulingConfig;
use storage::FleetStore;
use telemetry_ingest::{FlagPolicy, Simulator};

/// Application state shared across handlers
pub struct AppState {
    /// Fleet store
    pub store: Arc<FleetStore>,
    /// Scheduling engine configuration
    pub scheduling: SchedulingConfig,
    /// Flagging thresholds for the ingest route
    pub flag_policy: FlagPolicy,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create application state from loaded settings
    pub fn new(store: Arc<FleetStore>, settings: &Settings) -> Self {
        Self {
            store,
            scheduling: settings.scheduling.clone(),
            flag_policy: settings.flag_policy.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub metrics: StoreMetrics,
}

/// Store counters for health reporting
#[derive(Debug, Serialize)]
pub struct StoreMetrics {
    pub vehicle_count: usize,
    pub booking_count: usize,
    pub telemetry_count: usize,
    pub open_flag_count: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/slots", get(routes::slots::get_slots))
        .route("/api/v1/schedule/batch", post(routes::schedule::schedule_batch))
        .route("/api/v1/bookings", get(routes::bookings::list_bookings))
        .route(
            "/api/v1/bookings/:booking_id/confirm",
            post(routes::bookings::confirm_booking),
        )
        .route("/api/v1/telemetry", post(routes::telemetry::ingest_telemetry))
        .route(
            "/api/v1/notifications",
            get(routes::notifications::list_notifications),
        )
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        metrics: StoreMetrics {
            vehicle_count: state.store.vehicle_count(),
            booking_count: state.store.booking_count(),
            telemetry_count: state.store.telemetry_count(),
            open_flag_count: state.store.open_flag_count(),
        },
    })
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let store = Arc::new(FleetStore::new());
    if settings.seed_demo_data {
        storage::seed::load_demo_fleet(&store)?;
    }

    if settings.simulator_enabled {
        let simulator = Arc::new(Simulator::new(
            Arc::clone(&store),
            settings.flag_policy.clone(),
            settings.simulator.clone(),
        ));
        tokio::spawn({
            let simulator = Arc::clone(&simulator);
            async move { simulator.run().await }
        });
    } else {
        warn!("Telemetry simulator disabled; only external readings arrive");
    }

    let addr = settings.bind_addr.clone();
    let state = Arc::new(AppState::new(store, &settings));
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_store_counts() {
        let store = Arc::new(FleetStore::new());
        storage::seed::load_demo_fleet(&store).unwrap();
        let state = Arc::new(AppState::new(store, &Settings::default()));

        let response = health_handler(State(state)).await.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
