//! Result formatting for the console and for machines

mod console;
mod formatter;
mod json;

pub use console::ConsoleFormatter;
pub use formatter::{ResultFormatter, formatter_for};
pub use json::JsonFormatter;
