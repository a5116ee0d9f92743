//! Stateful retry bookkeeping shared by invocations.

pub mod retry_tracker;

pub use retry_tracker::RetryStateTracker;
