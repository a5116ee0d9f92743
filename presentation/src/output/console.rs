//! Console output formatter for invocation results

use super::formatter::ResultFormatter;
use colored::Colorize;
use mend_application::InvokeError;
use mend_domain::{ConfigIssue, ErrorKind, ToolInvocationRequest, ToolInvocationResult};

/// Formats invocation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(request: &ToolInvocationRequest, mark: String, status: String) -> String {
        format!(
            "{} {} {}\n",
            mark,
            request.tool_name().bold(),
            format!("({})", status).dimmed()
        )
    }

    /// Description, suggestion and retryability of a classified failure
    pub fn format_error_kind(kind: &ErrorKind) -> String {
        let mut output = format!("{} {}\n", "Error:".red().bold(), kind.description());
        if let Some(suggestion) = kind.recovery_suggestion() {
            output.push_str(&format!("{} {}\n", "Suggestion:".cyan().bold(), suggestion));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Retryable:".cyan().bold(),
            if kind.is_retryable() { "yes" } else { "no" }
        ));
        output
    }
}

impl ResultFormatter for ConsoleFormatter {
    fn format_result(
        &self,
        request: &ToolInvocationRequest,
        result: &ToolInvocationResult,
    ) -> String {
        let text = result.text();

        if result.was_self_healed() {
            let mut output = Self::header(
                request,
                "~".yellow().bold().to_string(),
                "partial result".to_string(),
            );
            if let Some(kind) = &result.error_kind {
                output.push_str(&format!(
                    "{} {}\n",
                    "Last error:".yellow().bold(),
                    kind.description()
                ));
            }
            output.push('\n');
            output.push_str(&text);
            return output;
        }

        if result.is_success() {
            let mut output =
                Self::header(request, "v".green().bold().to_string(), "ok".to_string());
            output.push('\n');
            output.push_str(&text);
            return output;
        }

        let mut output = Self::header(request, "x".red().bold().to_string(), "failed".to_string());
        match &result.error_kind {
            Some(kind) => output.push_str(&Self::format_error_kind(kind)),
            None => output.push_str(&format!("{} {}\n", "Error:".red().bold(), text)),
        }
        if result.error_kind.is_some() && !text.trim().is_empty() {
            output.push_str(&format!("\n{}\n{}", "Output:".cyan().bold(), text));
        }
        output
    }

    fn format_error(&self, error: &InvokeError) -> String {
        format!("{} {}", "x".red().bold(), error)
    }

    fn format_issues(&self, issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| {
                let label = if issue.is_error() {
                    "error:".red().bold()
                } else {
                    "warning:".yellow().bold()
                };
                format!("{} {}", label, issue.message)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
