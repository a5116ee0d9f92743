//! Invocation domain module
//!
//! The data contracts that cross the executor boundary: a
//! [`ToolInvocationRequest`] goes in, one [`ToolInvocationResult`] comes out
//! per attempt.
//!
//! ```text
//! ┌──────────────────────┐   call_tool   ┌──────────────────────┐
//! │ ToolInvocationRequest│──────────────▶│ ToolInvocationResult │
//! │ (reused per retry)   │               │ (one per attempt)    │
//! └──────────────────────┘               └──────────────────────┘
//! ```

pub mod entities;
pub mod value_objects;

pub use entities::{ContextId, InvocationId, ToolInvocationRequest};
pub use value_objects::{ResultProvenance, ToolInvocationResult, UnclassifiedErrorPayload};
