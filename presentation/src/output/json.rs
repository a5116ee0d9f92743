//! JSON output formatter

use super::formatter::ResultFormatter;
use mend_application::InvokeError;
use mend_domain::{ConfigIssue, ToolInvocationRequest, ToolInvocationResult};
use serde_json::json;

/// Formats invocation results as pretty-printed JSON
pub struct JsonFormatter;

impl ResultFormatter for JsonFormatter {
    fn format_result(
        &self,
        request: &ToolInvocationRequest,
        result: &ToolInvocationResult,
    ) -> String {
        let error = result.error_kind.as_ref().map(|kind| {
            json!({
                "kind": kind.label(),
                "description": kind.description(),
                "suggestion": kind.recovery_suggestion(),
                "retryable": kind.is_retryable(),
            })
        });

        let value = json!({
            "tool": request.tool_name(),
            "context_id": request.context_id().as_str(),
            "success": result.is_success(),
            "provenance": result.provenance,
            "content": result.text(),
            "error": error,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_error(&self, error: &InvokeError) -> String {
        error.to_payload().to_json()
    }

    fn format_issues(&self, issues: &[ConfigIssue]) -> String {
        let issues: Vec<_> = issues
            .iter()
            .map(|issue| {
                json!({
                    "severity": if issue.is_error() { "error" } else { "warning" },
                    "code": format!("{:?}", issue.code),
                    "message": issue.message,
                })
            })
            .collect();
        json!({ "issues": issues }).to_string()
    }
}
