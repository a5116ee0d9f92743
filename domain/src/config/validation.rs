//! Configuration issues.
//!
//! Validation never fails hard: it returns a list of [`ConfigIssue`]s and
//! the host decides what to do with them (errors abort, warnings are
//! printed).
//!
//! # Examples
//!
//! ```
//! use mend_domain::RetryPolicies;
//! use mend_domain::config::validation::validate_policies;
//!
//! let issues = validate_policies(&RetryPolicies::default());
//! assert!(issues.is_empty());
//! ```

use crate::retry::policy::{RetryPolicies, RetryPolicy};

/// Retry counts above this are almost always a misconfiguration.
pub const EXCESSIVE_RETRIES: u32 = 10;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A retry policy has out-of-range parameters.
    InvalidRetryPolicy,
    /// Retries are disabled for a tool or the default.
    RetriesDisabled,
    /// `max_retries` is above [`EXCESSIVE_RETRIES`].
    ExcessiveRetries,
    /// No executor is configured, so every call fails with "not found".
    NoExecutors,
    /// Two executors share the same name.
    DuplicateExecutor,
    /// An executor has an empty command.
    EmptyCommand,
    /// An executor timeout of zero.
    ZeroTimeout,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Check the default policy and every override.
///
/// Overrides are reported in tool-name order so output is stable.
pub fn validate_policies(policies: &RetryPolicies) -> Vec<ConfigIssue> {
    let mut issues = validate_policy("default", policies.default_policy());

    let mut names: Vec<&String> = policies.overrides().keys().collect();
    names.sort();
    for name in names {
        if let Some(policy) = policies.overrides().get(name) {
            issues.extend(validate_policy(name, policy));
        }
    }

    issues
}

fn validate_policy(scope: &str, policy: &RetryPolicy) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if let Err(e) = policy.validate() {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::InvalidRetryPolicy,
            format!("retry policy '{}': {}", scope, e),
        ));
    }

    if policy.max_retries == 0 {
        issues.push(ConfigIssue::warning(
            ConfigIssueCode::RetriesDisabled,
            format!("retry policy '{}' has max_retries = 0; failures are final", scope),
        ));
    } else if policy.max_retries > EXCESSIVE_RETRIES {
        issues.push(ConfigIssue::warning(
            ConfigIssueCode::ExcessiveRetries,
            format!(
                "retry policy '{}' allows {} retries (more than {})",
                scope, policy.max_retries, EXCESSIVE_RETRIES
            ),
        ));
    }

    issues
}
