//! Threshold-based maintenance flagging
//!
//! Stands in for the ML collaborator: additive risk scoring over telemetry
//! thresholds. The scheduler only sees the resulting flags.

use crate::ingest::TelemetryReading;
use serde::{Deserialize, Serialize};
use storage::BrakeCondition;

/// A maintenance flag proposal produced by the policy
#[derive(Debug, Clone)]
pub struct FlagCandidate {
    pub risk_factors: Vec<String>,
    /// 0-100 continuous
    pub severity_score: f64,
    pub confidence: f64,
}

/// Flagging thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagPolicy {
    pub oil_critical: f64,
    pub oil_low: f64,
    pub battery_low: f64,
    pub battery_warn: f64,
    pub tire_very_low: f64,
    pub tire_low: f64,
    /// Minimum additive score before a flag is raised
    pub flag_threshold: f64,
}

impl Default for FlagPolicy {
    fn default() -> Self {
        Self {
            oil_critical: 3.0,
            oil_low: 5.0,
            battery_low: 50.0,
            battery_warn: 70.0,
            tire_very_low: 28.0,
            tire_low: 30.0,
            flag_threshold: 40.0,
        }
    }
}

impl FlagPolicy {
    /// Evaluate one reading; `Some` when the additive score reaches the
    /// flag threshold. Severity is capped at 100 so stacked factors stay on
    /// the documented scale.
    pub fn evaluate(&self, reading: &TelemetryReading) -> Option<FlagCandidate> {
        let mut risk_factors = Vec::new();
        let mut score = 0.0;

        if reading.oil_quality < self.oil_critical {
            risk_factors.push("critical oil quality".to_string());
            score += 40.0;
        } else if reading.oil_quality < self.oil_low {
            risk_factors.push("low oil quality".to_string());
            score += 20.0;
        }

        if reading.battery_percent < self.battery_low {
            risk_factors.push("low battery".to_string());
            score += 30.0;
        } else if reading.battery_percent < self.battery_warn {
            risk_factors.push("battery needs attention".to_string());
            score += 15.0;
        }

        match reading.brake_condition {
            BrakeCondition::Poor => {
                risk_factors.push("poor brake condition".to_string());
                score += 35.0;
            }
            BrakeCondition::Warning => {
                risk_factors.push("brake warning".to_string());
                score += 20.0;
            }
            BrakeCondition::Good => {}
        }

        if reading.tire_pressure < self.tire_very_low {
            risk_factors.push("very low tire pressure".to_string());
            score += 25.0;
        } else if reading.tire_pressure < self.tire_low {
            risk_factors.push("low tire pressure".to_string());
            score += 10.0;
        }

        if score < self.flag_threshold {
            return None;
        }

        let confidence = (0.75 + score / 400.0).min(1.0);
        Some(FlagCandidate {
            risk_factors,
            severity_score: score.min(100.0),
            confidence,
        })
    }
}
