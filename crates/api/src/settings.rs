//! Server settings
//!
//! Loaded from an optional `fleetcare.*` file and `FLEET_`-prefixed
//! environment variables, on top of the documented defaults.

use scheduling::SchedulingConfig;
use serde::Deserialize;
use telemetry_ingest::{FlagPolicy, SimulatorConfig};

/// Server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Listen address
    pub bind_addr: String,
    /// Load the demo fleet on startup
    pub seed_demo_data: bool,
    /// Run the synthetic telemetry producer
    pub simulator_enabled: bool,
    pub scheduling: SchedulingConfig,
    pub flag_policy: FlagPolicy,
    pub simulator: SimulatorConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            seed_demo_data: true,
            simulator_enabled: true,
            scheduling: SchedulingConfig::default(),
            flag_policy: FlagPolicy::default(),
            simulator: SimulatorConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("fleetcare").required(false))
            .add_source(config::Environment::with_prefix("FLEET").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.bind_addr, "0.0.0.0:8080");
        assert!(settings.simulator_enabled);
        assert!((settings.scheduling.severity_weight - 0.40).abs() < 1e-9);
    }
}
