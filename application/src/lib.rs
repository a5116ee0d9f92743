//! Application layer for tool-mend
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod tracking;
pub mod use_cases;

// Re-export commonly used types
pub use config::PolicyRegistry;
pub use ports::{
    attempt_logger::{AttemptEvent, AttemptLogger, NoAttemptLogger},
    recovery::{NoRecovery, RecoveryError, RecoveryHook},
    retry_progress::{NoRetryProgress, RetryProgressNotifier},
    tool_executor::ToolExecutorPort,
};
pub use tracking::RetryStateTracker;
pub use use_cases::execute_with_retry::{ExecuteWithRetryUseCase, InvokeError};
