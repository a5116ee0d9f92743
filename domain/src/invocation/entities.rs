//! Invocation entities: identifiers and the immutable request.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque handle of the conversation/session an invocation belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContextId(String);

impl ContextId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContextId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ContextId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Unique identifier of one logical invocation.
///
/// Generated once per call to the invoker and stable across all of its
/// retries. Retry bookkeeping is keyed by this id, never by tool name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(String);

impl InvocationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random (UUID v4) id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A request to invoke a tool.
///
/// Immutable once built; the same request is reused for every attempt of
/// one logical call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocationRequest {
    tool_name: String,
    arguments: HashMap<String, serde_json::Value>,
    context_id: ContextId,
}

impl ToolInvocationRequest {
    /// Create a request, rejecting an empty tool name.
    pub fn new(
        tool_name: impl Into<String>,
        context_id: impl Into<ContextId>,
    ) -> Result<Self, DomainError> {
        let tool_name = tool_name.into();
        if tool_name.trim().is_empty() {
            return Err(DomainError::EmptyToolName);
        }
        Ok(Self {
            tool_name,
            arguments: HashMap::new(),
            context_id: context_id.into(),
        })
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_arguments(mut self, arguments: HashMap<String, serde_json::Value>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn arguments(&self) -> &HashMap<String, serde_json::Value> {
        &self.arguments
    }

    pub fn context_id(&self) -> &ContextId {
        &self.context_id
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}
