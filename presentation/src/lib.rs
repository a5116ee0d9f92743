//! Presentation layer for tool-mend
//!
//! This crate contains the CLI definition, result formatters and
//! retry progress reporters.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, InvokeArgs, OutputFormat};
pub use config::OutputConfig;
pub use output::{ConsoleFormatter, JsonFormatter, ResultFormatter, formatter_for};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
