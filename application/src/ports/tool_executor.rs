//! Tool Executor port
//!
//! Defines the interface for performing one attempt of a tool invocation.

use async_trait::async_trait;
use mend_domain::{ToolInvocationRequest, ToolInvocationResult};

/// Port for tool execution
///
/// This port defines how the application layer calls tools.
/// Implementations (adapters) live in the infrastructure layer.
///
/// Failures are reported in-band: a result with `is_error = true` whose
/// segments describe what went wrong. The invoker classifies that text, so
/// adapters should keep messages close to what the tool itself produced.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Perform one attempt of the invocation.
    async fn call_tool(&self, request: &ToolInvocationRequest) -> ToolInvocationResult;
}
