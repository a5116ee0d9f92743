//! Tool executors: adapters behind [`ToolExecutorPort`](mend_application::ToolExecutorPort).
//!
//! - [`ProcessExecutor`] runs one external command per call
//! - [`ExecutorManager`] routes tool names to executors and tracks which
//!   ones are running

mod error;
mod manager;
mod process;
mod spec;

pub use error::ExecutorError;
pub use manager::ExecutorManager;
pub use process::{MAX_OUTPUT_SIZE, ProcessExecutor};
pub use spec::ExecutorSpec;
