//! Priority Scorer
//!
//! Computes the composite urgency score used to order vehicles when they
//! contend for scarce slots. Deterministic, no side effects.

use crate::SchedulingConfig;
use chrono::{DateTime, Utc};
use storage::CustomerTier;

/// Composite priority scorer
///
/// `score = severity*Wsev + tier*Wtier + proximity*Wprox - min(wait, cap)*Wwait`
///
/// The wait penalty subtracts: a vehicle waiting longer scores lower, with
/// the effect bounded by `wait_cap_days`. The result is clamped to [0, 100]
/// so booking snapshots stay on the documented scale.
pub struct PriorityScorer {
    config: SchedulingConfig,
}

impl PriorityScorer {
    pub fn new(config: SchedulingConfig) -> Self {
        Self { config }
    }

    /// Score one vehicle/flag pairing.
    ///
    /// `severity` and `proximity` are 0-100 signals; `wait_days` is elapsed
    /// whole days since the flag was raised.
    pub fn score(
        &self,
        severity: f64,
        tier: CustomerTier,
        proximity: f64,
        wait_days: i64,
    ) -> f64 {
        let c = &self.config;
        let severity = severity.clamp(0.0, 100.0);
        let proximity = proximity.clamp(0.0, 100.0);
        let wait = wait_days.max(0).min(c.wait_cap_days.max(0)) as f64;

        let raw = severity * c.severity_weight
            + self.tier_score(tier) * c.tier_weight
            + proximity * c.proximity_weight
            - wait * c.wait_penalty_weight;

        raw.clamp(0.0, 100.0)
    }

    /// Elapsed whole days between the flag instant and now, never negative
    pub fn wait_days(flagged_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        (now - flagged_at).num_days().max(0)
    }

    fn tier_score(&self, tier: CustomerTier) -> f64 {
        match tier {
            CustomerTier::Fleet => self.config.tier_scores.fleet,
            CustomerTier::Premium => self.config.tier_scores.premium,
            CustomerTier::Standard => self.config.tier_scores.standard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn scorer() -> PriorityScorer {
        PriorityScorer::new(SchedulingConfig::default())
    }

    #[test]
    fn test_documented_example() {
        // severity 90, fleet tier, proximity 80, no wait:
        // 90*0.40 + 30*0.20 + 80*0.25 - 0 = 62.0
        let score = scorer().score(90.0, CustomerTier::Fleet, 80.0, 0);
        assert!((score - 62.0).abs() < 1e-9);
    }

    #[test]
    fn test_tier_ordering() {
        let s = scorer();
        let fleet = s.score(50.0, CustomerTier::Fleet, 75.0, 0);
        let premium = s.score(50.0, CustomerTier::Premium, 75.0, 0);
        let standard = s.score(50.0, CustomerTier::Standard, 75.0, 0);
        assert!(fleet > premium);
        assert!(premium > standard);
    }

    #[test]
    fn test_wait_subtracts_and_caps() {
        let s = scorer();
        let fresh = s.score(50.0, CustomerTier::Standard, 75.0, 0);
        let waited = s.score(50.0, CustomerTier::Standard, 75.0, 10);
        assert!(waited < fresh);

        let at_cap = s.score(50.0, CustomerTier::Standard, 75.0, 30);
        let past_cap = s.score(50.0, CustomerTier::Standard, 75.0, 365);
        assert!((at_cap - past_cap).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_inputs_clamped() {
        let s = scorer();
        let score = s.score(500.0, CustomerTier::Fleet, 500.0, -3);
        assert!(score <= 100.0);
        let low = s.score(-50.0, CustomerTier::Standard, 0.0, 365);
        assert!(low >= 0.0);
    }

    #[test]
    fn test_wait_days() {
        let flagged = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 5, 10, 0, 0).unwrap();
        assert_eq!(PriorityScorer::wait_days(flagged, now), 4);
        // flag from the future never yields negative wait
        assert_eq!(PriorityScorer::wait_days(now, flagged), 0);
    }

    proptest! {
        #[test]
        fn prop_score_in_range(
            severity in 0.0..=100.0f64,
            proximity in 0.0..=100.0f64,
            wait in 0i64..365,
        ) {
            let score = scorer().score(severity, CustomerTier::Premium, proximity, wait);
            prop_assert!((0.0..=100.0).contains(&score));
        }

        #[test]
        fn prop_monotone_in_severity(
            lo in 0.0..=100.0f64,
            delta in 0.0..=50.0f64,
            proximity in 0.0..=100.0f64,
            wait in 0i64..60,
        ) {
            let s = scorer();
            let hi = (lo + delta).min(100.0);
            let score_lo = s.score(lo, CustomerTier::Standard, proximity, wait);
            let score_hi = s.score(hi, CustomerTier::Standard, proximity, wait);
            prop_assert!(score_hi >= score_lo);
        }
    }
}
