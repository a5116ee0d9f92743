//! Retry policy: attempt limits and exponential backoff with jitter.
//!
//! ```text
//! exponential = base_delay * backoff_multiplier ^ attempt_index
//! capped      = min(exponential, max_delay)
//! jitter      = capped * jitter_factor * U(-1, 1)
//! delay       = max(100ms, capped + jitter)
//! ```
//!
//! `attempt_index` is 0-based: index 0 is the pause before the first retry.

use crate::core::error::DomainError;
use rand::Rng;
use std::collections::HashMap;
use std::time::Duration;

/// Floor applied to every computed delay, even with maximal negative jitter.
pub const MIN_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Retry limits and backoff parameters for one tool (or the default).
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt (total attempts = max_retries + 1).
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Relative jitter; 0.10 means ±10%.
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter_factor: 0.10,
        }
    }
}

impl RetryPolicy {
    // ==================== Builder Methods ====================

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_jitter_factor(mut self, factor: f64) -> Self {
        self.jitter_factor = factor;
        self
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self::default().with_max_retries(0)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(DomainError::InvalidPolicy(format!(
                "backoff_multiplier must be a finite value >= 1.0, got {}",
                self.backoff_multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err(DomainError::InvalidPolicy(format!(
                "jitter_factor must be within [0, 1], got {}",
                self.jitter_factor
            )));
        }
        if self.max_delay < self.base_delay {
            return Err(DomainError::InvalidPolicy(format!(
                "max_delay ({:?}) must not be smaller than base_delay ({:?})",
                self.max_delay, self.base_delay
            )));
        }
        Ok(())
    }

    /// Backoff before retry number `attempt_index + 1`, with a random jitter draw.
    pub fn delay_for_attempt(&self, attempt_index: u32) -> Duration {
        let draw = rand::thread_rng().gen_range(-1.0..=1.0);
        self.delay_for_attempt_with_draw(attempt_index, draw)
    }

    /// Deterministic variant of [`delay_for_attempt`](Self::delay_for_attempt).
    ///
    /// `draw` is the uniform sample in `[-1, 1]`; values outside are clamped.
    pub fn delay_for_attempt_with_draw(&self, attempt_index: u32, draw: f64) -> Duration {
        let capped = self.capped_delay_secs(attempt_index);
        let draw = if draw.is_nan() { 0.0 } else { draw.clamp(-1.0, 1.0) };
        let jitter = capped * self.jitter_factor * draw;
        let secs = (capped + jitter).max(MIN_RETRY_DELAY.as_secs_f64());
        Duration::try_from_secs_f64(secs).unwrap_or(self.max_delay)
    }

    /// Backoff without jitter, i.e. the expected delay for an index.
    pub fn capped_delay(&self, attempt_index: u32) -> Duration {
        Duration::try_from_secs_f64(self.capped_delay_secs(attempt_index)).unwrap_or(self.max_delay)
    }

    fn capped_delay_secs(&self, attempt_index: u32) -> f64 {
        let exponent = i32::try_from(attempt_index).unwrap_or(i32::MAX);
        let exponential = self.base_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        let max = self.max_delay.as_secs_f64();
        if exponential.is_finite() {
            exponential.min(max)
        } else {
            max
        }
    }
}

/// Default policy plus per-tool overrides (exact tool-name match).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryPolicies {
    default: RetryPolicy,
    overrides: HashMap<String, RetryPolicy>,
}

impl RetryPolicies {
    pub fn new(default: RetryPolicy) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, tool_name: impl Into<String>, policy: RetryPolicy) -> Self {
        self.overrides.insert(tool_name.into(), policy);
        self
    }

    pub fn set_override(&mut self, tool_name: impl Into<String>, policy: RetryPolicy) {
        self.overrides.insert(tool_name.into(), policy);
    }

    pub fn remove_override(&mut self, tool_name: &str) -> Option<RetryPolicy> {
        self.overrides.remove(tool_name)
    }

    pub fn set_default(&mut self, policy: RetryPolicy) {
        self.default = policy;
    }

    pub fn default_policy(&self) -> &RetryPolicy {
        &self.default
    }

    pub fn overrides(&self) -> &HashMap<String, RetryPolicy> {
        &self.overrides
    }

    /// Policy for a tool, falling back to the default.
    pub fn policy_for(&self, tool_name: &str) -> &RetryPolicy {
        self.overrides.get(tool_name).unwrap_or(&self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_jitter() -> RetryPolicy {
        RetryPolicy::default().with_jitter_factor(0.0)
    }

    #[test]
    fn test_default_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
        assert_eq!(policy.max_delay, Duration::from_secs(30));
        assert_eq!(policy.backoff_multiplier, 2.0);
        assert_eq!(policy.jitter_factor, 0.10);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_backoff_without_jitter() {
        let policy = no_jitter();
        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(10), Duration::from_secs(30));
    }

    #[test]
    fn test_huge_attempt_index_saturates_to_cap() {
        let policy = no_jitter();
        assert_eq!(policy.delay_for_attempt(u32::MAX), Duration::from_secs(30));
        assert_eq!(policy.capped_delay(5_000), Duration::from_secs(30));
    }

    #[test]
    fn test_jitter_bounds() {
        for jitter in [0.0, 0.1, 0.5, 1.0] {
            let policy = RetryPolicy::default().with_jitter_factor(jitter);
            for attempt in 0..8 {
                let capped = policy.capped_delay(attempt).as_secs_f64();
                let low = (capped * (1.0 - jitter)).max(0.1);
                let high = capped * (1.0 + jitter);
                for _ in 0..50 {
                    let delay = policy.delay_for_attempt(attempt).as_secs_f64();
                    assert!(
                        delay >= low - 1e-6 && delay <= high + 1e-6,
                        "delay {} outside [{}, {}] for attempt {} jitter {}",
                        delay,
                        low,
                        high,
                        attempt,
                        jitter
                    );
                }
            }
        }
    }

    #[test]
    fn test_deterministic_draw_extremes() {
        let policy = RetryPolicy::default();
        let high = policy.delay_for_attempt_with_draw(0, 1.0).as_secs_f64();
        let low = policy.delay_for_attempt_with_draw(0, -1.0).as_secs_f64();
        assert!((high - 1.1).abs() < 1e-9);
        assert!((low - 0.9).abs() < 1e-9);
        // Out-of-range draws are clamped
        assert_eq!(
            policy.delay_for_attempt_with_draw(0, 7.0),
            policy.delay_for_attempt_with_draw(0, 1.0)
        );
    }

    #[test]
    fn test_floor_applies_with_full_negative_jitter() {
        let policy = RetryPolicy::default()
            .with_base_delay(Duration::from_millis(50))
            .with_jitter_factor(1.0);
        let delay = policy.delay_for_attempt_with_draw(0, -1.0);
        assert!((delay.as_secs_f64() - MIN_RETRY_DELAY.as_secs_f64()).abs() < 1e-9);
    }

    #[test]
    fn test_expected_delay_non_decreasing_until_cap() {
        let policy = RetryPolicy::default();
        let delays: Vec<_> = (0..12).map(|i| policy.capped_delay(i)).collect();
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(delays[11], Duration::from_secs(30));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(
            RetryPolicy::default()
                .with_backoff_multiplier(0.5)
                .validate()
                .is_err()
        );
        assert!(
            RetryPolicy::default()
                .with_backoff_multiplier(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(RetryPolicy::default().with_jitter_factor(1.5).validate().is_err());
        assert!(
            RetryPolicy::default()
                .with_max_delay(Duration::from_millis(10))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_policies_override_lookup() {
        let slow = RetryPolicy::default().with_max_retries(5);
        let policies = RetryPolicies::default().with_override("search::lookup", slow.clone());

        assert_eq!(policies.policy_for("search::lookup"), &slow);
        assert_eq!(policies.policy_for("search::other"), &RetryPolicy::default());
        // Exact match only
        assert_eq!(policies.policy_for("SEARCH::LOOKUP"), &RetryPolicy::default());
    }

    #[test]
    fn test_policies_remove_override() {
        let mut policies = RetryPolicies::default();
        policies.set_override("a", RetryPolicy::no_retry());
        assert_eq!(policies.policy_for("a").max_retries, 0);

        assert!(policies.remove_override("a").is_some());
        assert_eq!(policies.policy_for("a").max_retries, 3);
        assert!(policies.remove_override("a").is_none());
    }
}
