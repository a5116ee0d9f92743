//! Domain layer for tool-mend
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Invocation
//!
//! A [`ToolInvocationRequest`] names a tool, its arguments and a caller
//! context. Each attempt yields one [`ToolInvocationResult`].
//!
//! ## Retry
//!
//! Failed results are classified into an [`ErrorKind`]. Transient kinds are
//! retried under a [`RetryPolicy`] (exponential backoff with jitter);
//! permanent kinds fail fast.
//!
//! ## Self-healing
//!
//! When retries run out, [`extract_partial_results`] salvages what it can
//! from the last output.

pub mod config;
pub mod core;
pub mod healing;
pub mod invocation;
pub mod retry;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity, validate_policies};
pub use core::error::DomainError;
pub use healing::{SelfHealedResult, TRUNCATION_MARKER, extract_partial_results};
pub use invocation::{
    ContextId, InvocationId, ResultProvenance, ToolInvocationRequest, ToolInvocationResult,
    UnclassifiedErrorPayload,
};
pub use retry::{
    ErrorKind, MIN_RETRY_DELAY, RetryDecision, RetryPolicies, RetryPolicy, RetryState, classify,
};
