//! Per-invocation retry bookkeeping.

use super::error_kind::ErrorKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Bookkeeping for one logical invocation across its failed attempts.
///
/// `attempt_count` starts at 0 when the first failure is recorded and is
/// only ever incremented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryState {
    pub tool_name: String,
    pub arguments: HashMap<String, serde_json::Value>,
    pub attempt_count: u32,
    pub last_error: Option<ErrorKind>,
    pub last_attempt_time: DateTime<Utc>,
}

impl RetryState {
    /// State for the first recorded failure.
    pub fn first_failure(
        tool_name: impl Into<String>,
        arguments: HashMap<String, serde_json::Value>,
        error: ErrorKind,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
            attempt_count: 0,
            last_error: Some(error),
            last_attempt_time: Utc::now(),
        }
    }

    /// Record a subsequent failure.
    pub fn record_failure(&mut self, error: ErrorKind) {
        self.attempt_count = self.attempt_count.saturating_add(1);
        self.last_error = Some(error);
        self.last_attempt_time = Utc::now();
    }
}

/// Outcome of a retry eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    pub allow: bool,
    pub delay: Duration,
}

impl RetryDecision {
    pub fn deny() -> Self {
        Self {
            allow: false,
            delay: Duration::ZERO,
        }
    }

    pub fn retry_after(delay: Duration) -> Self {
        Self { allow: true, delay }
    }
}
