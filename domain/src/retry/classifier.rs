//! Free-text error classification.
//!
//! Executors report failures as opaque text, so classification is a
//! substring search over the lower-cased content. Patterns are tested in a
//! fixed priority order and the first match wins: a message mentioning both
//! "timeout" and "network" is a [`ErrorKind::Timeout`].

use super::error_kind::ErrorKind;
use crate::invocation::value_objects::ToolInvocationResult;

/// Classify a failed result. Never fails; unmatched text becomes
/// [`ErrorKind::ExecutionFailed`] carrying the raw text.
pub fn classify(result: &ToolInvocationResult, tool_name: &str) -> ErrorKind {
    let raw = result.text();
    let text = raw.to_lowercase();
    let tool = tool_name.to_string();

    if text.contains("not found") || text.contains("does not exist") {
        ErrorKind::ToolNotFound { tool }
    } else if text.contains("not running") || (text.contains("server") && text.contains("stopped"))
    {
        ErrorKind::ServerNotRunning { tool }
    } else if text.contains("timeout") || text.contains("timed out") {
        ErrorKind::Timeout { tool }
    } else if text.contains("rate limit") || text.contains("too many requests") {
        ErrorKind::RateLimited {
            tool,
            retry_after: None,
        }
    } else if text.contains("network") || text.contains("connection") {
        ErrorKind::NetworkError { tool, message: raw }
    } else if text.contains("invalid") && text.contains("argument") {
        ErrorKind::InvalidArguments { tool, message: raw }
    } else {
        ErrorKind::ExecutionFailed { tool, message: raw }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_text(text: &str) -> ErrorKind {
        classify(&ToolInvocationResult::failure(text), "search::lookup")
    }

    #[test]
    fn test_not_found_patterns() {
        assert!(matches!(
            classify_text("Tool foo not found"),
            ErrorKind::ToolNotFound { .. }
        ));
        assert!(matches!(
            classify_text("The requested tool does not exist"),
            ErrorKind::ToolNotFound { .. }
        ));
    }

    #[test]
    fn test_server_not_running_patterns() {
        assert!(matches!(
            classify_text("Executor 'search' is not running"),
            ErrorKind::ServerNotRunning { .. }
        ));
        assert!(matches!(
            classify_text("MCP Server was Stopped unexpectedly"),
            ErrorKind::ServerNotRunning { .. }
        ));
        // "stopped" alone is not enough
        assert!(matches!(
            classify_text("job stopped"),
            ErrorKind::ExecutionFailed { .. }
        ));
    }

    #[test]
    fn test_timeout_patterns() {
        assert!(matches!(classify_text("Request timed out"), ErrorKind::Timeout { .. }));
        assert!(matches!(classify_text("TIMEOUT after 30s"), ErrorKind::Timeout { .. }));
    }

    #[test]
    fn test_rate_limit_has_no_explicit_retry_after() {
        assert_eq!(
            classify_text("429 Too Many Requests"),
            ErrorKind::RateLimited {
                tool: "search::lookup".to_string(),
                retry_after: None,
            }
        );
        assert!(matches!(
            classify_text("rate limit exceeded"),
            ErrorKind::RateLimited { .. }
        ));
    }

    #[test]
    fn test_network_patterns() {
        assert!(matches!(
            classify_text("connection reset by peer"),
            ErrorKind::NetworkError { .. }
        ));
        assert!(matches!(
            classify_text("Network unreachable"),
            ErrorKind::NetworkError { .. }
        ));
    }

    #[test]
    fn test_invalid_arguments_requires_both_words() {
        assert!(matches!(
            classify_text("Invalid argument: limit must be positive"),
            ErrorKind::InvalidArguments { .. }
        ));
        assert!(matches!(
            classify_text("invalid input"),
            ErrorKind::ExecutionFailed { .. }
        ));
    }

    #[test]
    fn test_priority_order() {
        // timeout beats network
        assert!(matches!(
            classify_text("network timeout"),
            ErrorKind::Timeout { .. }
        ));
        // not found beats everything
        assert!(matches!(
            classify_text("connection target not found after timeout"),
            ErrorKind::ToolNotFound { .. }
        ));
        // not running beats timeout
        assert!(matches!(
            classify_text("server not running, request timed out"),
            ErrorKind::ServerNotRunning { .. }
        ));
    }

    #[test]
    fn test_fallback_keeps_raw_text() {
        let result = ToolInvocationResult::from_segments(
            vec!["Segfault ".to_string(), "in worker".to_string()],
            true,
        );
        assert_eq!(
            classify(&result, "native::run"),
            ErrorKind::ExecutionFailed {
                tool: "native::run".to_string(),
                message: "Segfault in worker".to_string(),
            }
        );
    }
}
