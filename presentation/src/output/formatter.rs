//! Output formatter trait

use super::{ConsoleFormatter, JsonFormatter};
use mend_application::InvokeError;
use mend_domain::{ConfigIssue, OutputFormat, ToolInvocationRequest, ToolInvocationResult};

/// Formats the outcome of one invocation
pub trait ResultFormatter {
    /// Format the final result (success, self-healed or classified failure)
    fn format_result(&self, request: &ToolInvocationRequest, result: &ToolInvocationResult)
    -> String;

    /// Format an error that ended the invocation without a result
    fn format_error(&self, error: &InvokeError) -> String;

    /// Format configuration issues found at startup
    fn format_issues(&self, issues: &[ConfigIssue]) -> String;
}

/// Pick the formatter for an output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn ResultFormatter> {
    match format {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
