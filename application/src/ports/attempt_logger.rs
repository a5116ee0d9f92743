//! Port for structured attempt logging.
//!
//! Defines the [`AttemptLogger`] trait for recording every attempt of a
//! resilient invocation (start, failure, recovery, outcome) to a structured
//! log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! attempt transcript in a machine-readable format (JSONL).

use mend_domain::{ErrorKind, InvocationId};
use serde_json::{Value, json};
use std::time::Duration;

/// A structured attempt event for logging.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. Adapters add the timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptEvent {
    /// Event type identifier (e.g., "attempt_started", "attempt_failed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AttemptEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn attempt_started(
        id: &InvocationId,
        tool: &str,
        attempt: u32,
        delay: Option<Duration>,
    ) -> Self {
        Self::new(
            "attempt_started",
            json!({
                "invocation_id": id.as_str(),
                "tool": tool,
                "attempt": attempt,
                "delay_ms": delay.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            }),
        )
    }

    pub fn attempt_failed(id: &InvocationId, attempt: u32, error: &ErrorKind) -> Self {
        Self::new(
            "attempt_failed",
            json!({
                "invocation_id": id.as_str(),
                "tool": error.tool_name(),
                "attempt": attempt,
                "kind": error.label(),
                "retryable": error.is_retryable(),
                "message": error.to_string(),
            }),
        )
    }

    pub fn recovery(id: &InvocationId, error: &ErrorKind, recovered: bool) -> Self {
        Self::new(
            "recovery",
            json!({
                "invocation_id": id.as_str(),
                "tool": error.tool_name(),
                "kind": error.label(),
                "recovered": recovered,
            }),
        )
    }

    pub fn succeeded(id: &InvocationId, tool: &str, attempts: u32, self_healed: bool) -> Self {
        Self::new(
            "invocation_succeeded",
            json!({
                "invocation_id": id.as_str(),
                "tool": tool,
                "attempts": attempts,
                "self_healed": self_healed,
            }),
        )
    }

    pub fn exhausted(id: &InvocationId, attempts: u32, error: &ErrorKind) -> Self {
        Self::new(
            "invocation_failed",
            json!({
                "invocation_id": id.as_str(),
                "tool": error.tool_name(),
                "attempts": attempts,
                "kind": error.label(),
                "message": error.to_string(),
            }),
        )
    }
}

/// Port for logging attempt events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// The `log` method is synchronous and non-fallible so that logging never
/// disrupts an invocation; write failures are dropped.
pub trait AttemptLogger: Send + Sync {
    /// Record an attempt event.
    fn log(&self, event: AttemptEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoAttemptLogger;

impl AttemptLogger for NoAttemptLogger {
    fn log(&self, _event: AttemptEvent) {}
}
