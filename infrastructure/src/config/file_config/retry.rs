//! Retry configuration from TOML (`[retry]` section)
//!
//! Durations are given in seconds as floats. Per-tool overrides only need
//! the fields they change; the rest are inherited from `[retry]`.
//!
//! ```toml
//! [retry]
//! max_retries = 3
//! base_delay = 1.0
//! max_delay = 30.0
//! backoff_multiplier = 2.0
//! jitter_factor = 0.1
//!
//! [retry.tools."search::lookup"]
//! max_retries = 5
//! base_delay = 0.5
//! ```

use mend_domain::{ConfigIssue, ConfigIssueCode, RetryPolicies, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Raw default retry policy plus per-tool overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    pub max_retries: u32,
    /// Seconds
    pub base_delay: f64,
    /// Seconds
    pub max_delay: f64,
    pub backoff_multiplier: f64,
    pub jitter_factor: f64,
    /// Overrides keyed by exact tool name
    pub tools: HashMap<String, FileRetryOverride>,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_retries: policy.max_retries,
            base_delay: policy.base_delay.as_secs_f64(),
            max_delay: policy.max_delay.as_secs_f64(),
            backoff_multiplier: policy.backoff_multiplier,
            jitter_factor: policy.jitter_factor,
            tools: HashMap::new(),
        }
    }
}

/// Per-tool override; unset fields inherit from the default policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryOverride {
    pub max_retries: Option<u32>,
    pub base_delay: Option<f64>,
    pub max_delay: Option<f64>,
    pub backoff_multiplier: Option<f64>,
    pub jitter_factor: Option<f64>,
}

impl FileRetryConfig {
    /// Convert to domain policies.
    ///
    /// Durations that are negative or not finite are reported and replaced
    /// by the built-in default, so the returned policies are always usable.
    pub fn to_policies(&self) -> (RetryPolicies, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let builtin = RetryPolicy::default();

        let default = RetryPolicy {
            max_retries: self.max_retries,
            base_delay: seconds("retry.base_delay", self.base_delay, builtin.base_delay, &mut issues),
            max_delay: seconds("retry.max_delay", self.max_delay, builtin.max_delay, &mut issues),
            backoff_multiplier: self.backoff_multiplier,
            jitter_factor: self.jitter_factor,
        };

        let mut policies = RetryPolicies::new(default.clone());
        for (tool, o) in &self.tools {
            let field = |name: &str| format!("retry.tools.\"{}\".{}", tool, name);
            let policy = RetryPolicy {
                max_retries: o.max_retries.unwrap_or(default.max_retries),
                base_delay: match o.base_delay {
                    Some(secs) => seconds(&field("base_delay"), secs, default.base_delay, &mut issues),
                    None => default.base_delay,
                },
                max_delay: match o.max_delay {
                    Some(secs) => seconds(&field("max_delay"), secs, default.max_delay, &mut issues),
                    None => default.max_delay,
                },
                backoff_multiplier: o.backoff_multiplier.unwrap_or(default.backoff_multiplier),
                jitter_factor: o.jitter_factor.unwrap_or(default.jitter_factor),
            };
            policies.set_override(tool.clone(), policy);
        }

        (policies, issues)
    }
}

fn seconds(field: &str, value: f64, fallback: Duration, issues: &mut Vec<ConfigIssue>) -> Duration {
    match Duration::try_from_secs_f64(value) {
        Ok(duration) => duration,
        Err(_) => {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidRetryPolicy,
                format!(
                    "{}: {} is not a valid number of seconds, using {}",
                    field,
                    value,
                    fallback.as_secs_f64()
                ),
            ));
            fallback
        }
    }
}
