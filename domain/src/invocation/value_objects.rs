//! Invocation value objects: immutable results produced per attempt.
//!
//! Every executor attempt produces one [`ToolInvocationResult`]. The invoker
//! may attach an [`ErrorKind`] to a terminal failure, or replace a failure
//! with a synthetic success whose [`ResultProvenance`] is
//! [`SelfHealed`](ResultProvenance::SelfHealed) so callers can tell a clean
//! success from a recovered partial one.

use crate::retry::error_kind::ErrorKind;
use serde::{Deserialize, Serialize};

/// Where the content of a result came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultProvenance {
    /// Produced by the tool executor as-is.
    #[default]
    Executor,
    /// Synthesized from a failed result by the self-healing extractor.
    SelfHealed,
}

/// Result of one tool invocation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocationResult {
    /// Ordered text fragments; concatenation order matters.
    pub content_segments: Vec<String>,
    /// Whether the executor reported a failure.
    pub is_error: bool,
    #[serde(default)]
    pub provenance: ResultProvenance,
    /// Classification attached by the invoker to a terminal failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl ToolInvocationResult {
    /// Create a successful result with a single segment
    pub fn success(content: impl Into<String>) -> Self {
        Self::from_segments(vec![content.into()], false)
    }

    /// Create a failed result with a single segment
    pub fn failure(content: impl Into<String>) -> Self {
        Self::from_segments(vec![content.into()], true)
    }

    pub fn from_segments(content_segments: Vec<String>, is_error: bool) -> Self {
        Self {
            content_segments,
            is_error,
            provenance: ResultProvenance::Executor,
            error_kind: None,
        }
    }

    /// Build the synthetic success returned when self-healing recovers data.
    pub fn self_healed(content: impl Into<String>) -> Self {
        Self {
            content_segments: vec![content.into()],
            is_error: false,
            provenance: ResultProvenance::SelfHealed,
            error_kind: None,
        }
    }

    pub fn with_error_kind(mut self, kind: ErrorKind) -> Self {
        self.error_kind = Some(kind);
        self
    }

    /// All segments concatenated in order.
    pub fn text(&self) -> String {
        self.content_segments.concat()
    }

    pub fn is_success(&self) -> bool {
        !self.is_error
    }

    pub fn was_self_healed(&self) -> bool {
        self.provenance == ResultProvenance::SelfHealed
    }
}

/// Generic payload for errors that did not come from the classifier.
///
/// This is the one machine-readable contract of the engine:
///
/// ```json
/// {"error": "Tool execution failed", "message": "...", "type": "execution_error", "retryable": false}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnclassifiedErrorPayload {
    pub error: String,
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub retryable: bool,
}

impl UnclassifiedErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: "Tool execution failed".to_string(),
            message: message.into(),
            error_type: "execution_error".to_string(),
            retryable: false,
        }
    }

    pub fn from_error(error: &dyn std::error::Error) -> Self {
        Self::new(error.to_string())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Wrap the payload into a failed result.
    pub fn into_result(self) -> ToolInvocationResult {
        ToolInvocationResult::failure(self.to_json())
    }
}
