//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod attempt_logger;
pub mod recovery;
pub mod retry_progress;
pub mod tool_executor;
