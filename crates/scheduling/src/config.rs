//! Scheduling configuration

use serde::{Deserialize, Serialize};

/// Tier sub-scores on their own unnormalized scale, not 0-100
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TierScores {
    pub fleet: f64,
    pub premium: f64,
    pub standard: f64,
}

impl Default for TierScores {
    fn default() -> Self {
        Self {
            fleet: 30.0,
            premium: 20.0,
            standard: 10.0,
        }
    }
}

/// Scheduling configuration
///
/// Weights feed the priority formula
/// `severity*Wsev + tier*Wtier + proximity*Wprox - min(wait, cap)*Wwait`
/// and are expected to sum to 1.0 before the wait penalty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    pub severity_weight: f64,
    pub tier_weight: f64,
    pub proximity_weight: f64,
    pub wait_penalty_weight: f64,
    pub tier_scores: TierScores,

    /// Appointment slot length in minutes
    pub slot_duration_minutes: i64,

    /// Proximity placeholder used until real routing distance is wired in
    pub default_proximity: f64,

    /// Wait days beyond this stop affecting the score
    pub wait_cap_days: i64,

    /// Booking commit attempts per center before moving on
    pub commit_retries: u32,

    /// When set, a slot without a free technician is not bookable
    pub require_technician: bool,

    /// Seed for the center-shuffle rng; None draws from OS entropy
    pub rng_seed: Option<u64>,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            severity_weight: 0.40,
            tier_weight: 0.20,
            proximity_weight: 0.25,
            wait_penalty_weight: 0.15,
            tier_scores: TierScores::default(),
            slot_duration_minutes: 60,
            default_proximity: 75.0,
            wait_cap_days: 30,
            commit_retries: 3,
            require_technician: false,
            rng_seed: None,
        }
    }
}
