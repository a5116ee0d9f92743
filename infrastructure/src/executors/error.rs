//! Executor error types

use thiserror::Error;

/// Errors from building or controlling executors.
///
/// Failures of an individual tool call are not errors here; they come back
/// as failed results so the invoker can classify them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutorError {
    #[error("Executor '{0}' is defined more than once")]
    DuplicateExecutor(String),

    #[error("Executor '{0}' has an empty command")]
    EmptyCommand(String),

    #[error("Tool '{tool}' is claimed by both '{first}' and '{second}'")]
    ConflictingTool {
        tool: String,
        first: String,
        second: String,
    },

    #[error("Unknown executor: {0}")]
    UnknownExecutor(String),

    #[error("Command '{command}' for executor '{executor}' not found")]
    CommandNotFound { executor: String, command: String },
}
