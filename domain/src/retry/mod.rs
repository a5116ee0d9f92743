//! Retry domain module
//!
//! Pure decision inputs for the resilient invoker:
//!
//! - [`ErrorKind`]: closed taxonomy of failures with retryability and a
//!   suggested delay
//! - [`classify`]: maps a failed result's text to an [`ErrorKind`]
//! - [`RetryPolicy`] / [`RetryPolicies`]: attempt limits and backoff, with
//!   per-tool overrides
//! - [`RetryState`] / [`RetryDecision`]: per-invocation bookkeeping and the
//!   verdict derived from it
//!
//! The stateful tracker that stores [`RetryState`] values lives in the
//! application layer; everything here is free of I/O.

pub mod classifier;
pub mod error_kind;
pub mod policy;
pub mod state;

pub use classifier::classify;
pub use error_kind::ErrorKind;
pub use policy::{MIN_RETRY_DELAY, RetryPolicies, RetryPolicy};
pub use state::{RetryDecision, RetryState};
