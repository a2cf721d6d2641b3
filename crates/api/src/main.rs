//! Fleet Maintenance Pipeline - Main Entry Point

use api::{init_logging, run_server, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Fleet Maintenance Pipeline v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Starting scheduling and telemetry services...");

    let settings = Settings::load()?;
    run_server(settings).await
}
