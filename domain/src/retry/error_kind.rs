//! Error taxonomy for failed tool invocations.
//!
//! Nine kinds, split by whether retrying can help:
//!
//! | Kind | Retryable? | Suggested delay |
//! |------|-----------|-----------------|
//! | `ToolNotFound` | No | 0 |
//! | `InvalidArguments` | No | 0 |
//! | `ParseError` | No | 0 |
//! | `ValidationFailed` | No | 0 |
//! | `ServerNotRunning` | Yes | 1s |
//! | `ExecutionFailed` | Yes | 0 |
//! | `Timeout` | Yes | 0 |
//! | `RateLimited` | Yes | `retry_after`, else 5s |
//! | `NetworkError` | Yes | 1s |

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const RATE_LIMIT_DEFAULT_DELAY: Duration = Duration::from_secs(5);
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Classification of a failed invocation.
///
/// Every variant names the implicated tool so the value can be rendered or
/// routed to a recovery hook on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("Tool '{tool}' not found")]
    ToolNotFound { tool: String },

    #[error("Server for tool '{tool}' is not running")]
    ServerNotRunning { tool: String },

    #[error("Invalid arguments for tool '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("Tool '{tool}' failed: {message}")]
    ExecutionFailed { tool: String, message: String },

    #[error("Tool '{tool}' timed out")]
    Timeout { tool: String },

    #[error("Could not parse output of tool '{tool}': {message}")]
    ParseError { tool: String, message: String },

    #[error("Tool '{tool}' is rate limited")]
    RateLimited {
        tool: String,
        retry_after: Option<Duration>,
    },

    #[error("Network error while calling tool '{tool}': {message}")]
    NetworkError { tool: String, message: String },

    #[error("Validation failed for tool '{tool}': {message}")]
    ValidationFailed { tool: String, message: String },
}

impl ErrorKind {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorKind::ToolNotFound { .. }
            | ErrorKind::InvalidArguments { .. }
            | ErrorKind::ParseError { .. }
            | ErrorKind::ValidationFailed { .. } => false,
            ErrorKind::ServerNotRunning { .. }
            | ErrorKind::ExecutionFailed { .. }
            | ErrorKind::Timeout { .. }
            | ErrorKind::RateLimited { .. }
            | ErrorKind::NetworkError { .. } => true,
        }
    }

    /// Minimum pause this kind asks for before the next attempt.
    pub fn suggested_delay(&self) -> Duration {
        match self {
            ErrorKind::RateLimited { retry_after, .. } => {
                retry_after.unwrap_or(RATE_LIMIT_DEFAULT_DELAY)
            }
            ErrorKind::ServerNotRunning { .. } | ErrorKind::NetworkError { .. } => RECONNECT_DELAY,
            _ => Duration::ZERO,
        }
    }

    pub fn tool_name(&self) -> &str {
        match self {
            ErrorKind::ToolNotFound { tool }
            | ErrorKind::ServerNotRunning { tool }
            | ErrorKind::InvalidArguments { tool, .. }
            | ErrorKind::ExecutionFailed { tool, .. }
            | ErrorKind::Timeout { tool }
            | ErrorKind::ParseError { tool, .. }
            | ErrorKind::RateLimited { tool, .. }
            | ErrorKind::NetworkError { tool, .. }
            | ErrorKind::ValidationFailed { tool, .. } => tool,
        }
    }

    /// Short machine-friendly label (e.g. for structured logs).
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::ToolNotFound { .. } => "tool_not_found",
            ErrorKind::ServerNotRunning { .. } => "server_not_running",
            ErrorKind::InvalidArguments { .. } => "invalid_arguments",
            ErrorKind::ExecutionFailed { .. } => "execution_failed",
            ErrorKind::Timeout { .. } => "timeout",
            ErrorKind::ParseError { .. } => "parse_error",
            ErrorKind::RateLimited { .. } => "rate_limited",
            ErrorKind::NetworkError { .. } => "network_error",
            ErrorKind::ValidationFailed { .. } => "validation_failed",
        }
    }

    /// Human-readable description, identical to the `Display` output.
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// What the user can do about it, if anything.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            ErrorKind::ToolNotFound { .. } => {
                Some("Check the tool name and that its executor is configured")
            }
            ErrorKind::ServerNotRunning { .. } => Some("Start the executor that provides this tool"),
            ErrorKind::InvalidArguments { .. } => {
                Some("Fix the arguments to match what the tool expects")
            }
            ErrorKind::Timeout { .. } => Some("Narrow the request or raise the executor timeout"),
            ErrorKind::RateLimited { .. } => Some("Wait before retrying and reduce request frequency"),
            ErrorKind::NetworkError { .. } => Some("Check network connectivity to the executor"),
            ErrorKind::ParseError { .. } => Some("Inspect the raw tool output for malformed data"),
            ErrorKind::ValidationFailed { .. } => {
                Some("Adjust the request so it passes the tool's validation")
            }
            ErrorKind::ExecutionFailed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_kinds() -> Vec<ErrorKind> {
        let tool = "fs::read".to_string();
        vec![
            ErrorKind::ToolNotFound { tool: tool.clone() },
            ErrorKind::ServerNotRunning { tool: tool.clone() },
            ErrorKind::InvalidArguments {
                tool: tool.clone(),
                message: "bad".into(),
            },
            ErrorKind::ExecutionFailed {
                tool: tool.clone(),
                message: "boom".into(),
            },
            ErrorKind::Timeout { tool: tool.clone() },
            ErrorKind::ParseError {
                tool: tool.clone(),
                message: "eof".into(),
            },
            ErrorKind::RateLimited {
                tool: tool.clone(),
                retry_after: None,
            },
            ErrorKind::NetworkError {
                tool: tool.clone(),
                message: "reset".into(),
            },
            ErrorKind::ValidationFailed {
                tool,
                message: "schema".into(),
            },
        ]
    }

    #[test]
    fn test_retryability_split() {
        let (transient, permanent): (Vec<_>, Vec<_>) =
            all_kinds().into_iter().partition(|k| k.is_retryable());
        assert_eq!(transient.len(), 5);
        assert_eq!(permanent.len(), 4);

        let permanent_labels: Vec<_> = permanent.iter().map(|k| k.label()).collect();
        assert_eq!(
            permanent_labels,
            vec!["tool_not_found", "invalid_arguments", "parse_error", "validation_failed"]
        );
    }

    #[test]
    fn test_every_kind_names_its_tool() {
        for kind in all_kinds() {
            assert_eq!(kind.tool_name(), "fs::read");
            assert!(kind.description().contains("fs::read"));
        }
    }

    #[test]
    fn test_rate_limit_delay_prefers_retry_after() {
        let explicit = ErrorKind::RateLimited {
            tool: "api".into(),
            retry_after: Some(Duration::from_secs(10)),
        };
        assert_eq!(explicit.suggested_delay(), Duration::from_secs(10));

        let implicit = ErrorKind::RateLimited {
            tool: "api".into(),
            retry_after: None,
        };
        assert_eq!(implicit.suggested_delay(), Duration::from_secs(5));
    }

    #[test]
    fn test_permanent_kinds_suggest_no_delay() {
        for kind in all_kinds().into_iter().filter(|k| !k.is_retryable()) {
            assert_eq!(kind.suggested_delay(), Duration::ZERO);
        }
    }

    #[test]
    fn test_serde_tagging() {
        let kind = ErrorKind::Timeout {
            tool: "search::lookup".into(),
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["kind"], "timeout");
        assert_eq!(json["tool"], "search::lookup");

        let back: ErrorKind = serde_json::from_value(json).unwrap();
        assert_eq!(back, kind);
    }
}
