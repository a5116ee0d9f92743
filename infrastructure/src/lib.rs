//! Infrastructure layer for tool-mend
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod executors;
pub mod logging;
pub mod recovery;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileExecutorConfig, FileLoggingConfig, FileOutputConfig,
    FileRecoveryConfig, FileRetryConfig,
};
pub use executors::{ExecutorError, ExecutorManager, ExecutorSpec, ProcessExecutor};
pub use logging::JsonlAttemptLogger;
pub use recovery::ExecutorRecoveryHook;
