//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod executors;
mod logging;
mod output;
mod recovery;
mod retry;

pub use executors::{DEFAULT_EXECUTOR_TIMEOUT_SECS, FileExecutorConfig};
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use recovery::FileRecoveryConfig;
pub use retry::{FileRetryConfig, FileRetryOverride};

use mend_domain::{ConfigIssue, ConfigIssueCode, RetryPolicies, validate_policies};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Default retry policy and per-tool overrides
    pub retry: FileRetryConfig,
    /// Recovery hook settings
    pub recovery: FileRecoveryConfig,
    /// External tool executors
    pub executors: Vec<FileExecutorConfig>,
    /// Attempt log and diagnostic log locations
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Retry policies with invalid durations replaced by defaults.
    pub fn retry_policies(&self) -> RetryPolicies {
        self.retry.to_policies().0
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Retry durations and policy ranges
    /// 2. Executor definitions (names, commands, timeouts)
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Retry policies
        let (policies, retry_issues) = self.retry.to_policies();
        issues.extend(retry_issues);
        issues.extend(validate_policies(&policies));

        // 2. Executors
        if self.executors.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoExecutors,
                "no [[executors]] configured; every tool call will fail with 'not found'",
            ));
        }

        let mut seen = HashSet::new();
        for executor in &self.executors {
            if !seen.insert(executor.name.as_str()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateExecutor,
                    format!("executor '{}' is defined more than once", executor.name),
                ));
            }
            if executor.command.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyCommand,
                    format!("executor '{}' has an empty command", executor.name),
                ));
            }
            if executor.timeout_secs == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroTimeout,
                    format!("executor '{}': timeout_secs cannot be 0", executor.name),
                ));
            }
        }

        issues
    }
}
