//! Retry progress port.
//!
//! [`RetryProgressNotifier`] is an **output port** that the presentation layer
//! implements to show what the invoker is doing. All callback argument types
//! come from the domain layer.
//!
//! All methods have default no-op implementations, so implementers only
//! need to override the callbacks they care about.

use mend_domain::{ErrorKind, SelfHealedResult};
use std::time::Duration;

/// Progress notifier for a resilient invocation.
pub trait RetryProgressNotifier: Send + Sync {
    /// Called before every attempt.
    ///
    /// `attempt` is 1-based. `delay` is `None` for the first attempt and the
    /// backoff about to be waited otherwise.
    fn on_attempt(&self, _attempt: u32, _delay: Option<Duration>) {}

    /// Called after an attempt failed and was classified
    fn on_attempt_failed(&self, _attempt: u32, _error: &ErrorKind) {}

    /// Called after the recovery hook ran
    fn on_recovery(&self, _error: &ErrorKind, _recovered: bool) {}

    /// Called when partial results were salvaged from the final failure
    fn on_self_healed(&self, _healed: &SelfHealedResult) {}

    /// Called when the invocation ends in failure
    fn on_exhausted(&self, _attempts: u32, _error: &ErrorKind) {}
}

/// No-op implementation for when progress isn't needed
pub struct NoRetryProgress;

impl RetryProgressNotifier for NoRetryProgress {}
