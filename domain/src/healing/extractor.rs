//! Partial-result extraction from failed tool output.
//!
//! When an invocation fails for good, its last output often still contains
//! something usable: text received before a truncation, a JSON object, or
//! plain data lines mixed with error lines. The heuristics below run in a
//! fixed order and are cumulative:
//!
//! 1. **Truncation marker**: strip [`TRUNCATION_MARKER`]; keep the rest.
//! 2. **JSON fragment**: the first `{...}` without nested braces that parses.
//! 3. **Line partition**: lines mentioning `error`/`failed`/`exception` are
//!    failures, other non-blank lines are data. Data lines replace any
//!    earlier partial data (last writer wins).
//!
//! The accumulated notes then produce an explanation and suggestions.

use crate::core::string::clip_with_ellipsis;
use crate::invocation::value_objects::ToolInvocationResult;

/// Literal marker executors append when output was cut short.
pub const TRUNCATION_MARKER: &str = "[truncated]";

const MAX_ERROR_LINES: usize = 3;
const MAX_ERROR_LINE_CHARS: usize = 100;
const ERROR_LINE_KEYWORDS: [&str; 3] = ["error", "failed", "exception"];

/// What could be salvaged from a failed result.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfHealedResult {
    pub partial_data: Option<String>,
    pub successful_parts: Vec<String>,
    pub failed_parts: Vec<String>,
    pub explanation: String,
    pub can_continue: bool,
    pub suggestions: Vec<String>,
}

impl SelfHealedResult {
    pub fn has_partial_data(&self) -> bool {
        self.partial_data.as_deref().is_some_and(|d| !d.is_empty())
    }

    /// Render the content of the synthetic result handed back to callers.
    pub fn render(&self, tool_name: &str) -> String {
        let mut out = format!(
            "Partial result recovered from failed call to '{}'\n\n{}",
            tool_name, self.explanation
        );

        if !self.suggestions.is_empty() {
            out.push_str("\n\nSuggestions:\n");
            out.push_str(&bullet_list(&self.suggestions));
        }

        if let Some(data) = self.partial_data.as_deref()
            && !data.is_empty()
        {
            out.push_str("\n\nRecovered data:\n");
            out.push_str(data);
        }

        out
    }
}

/// Try to salvage usable data from a failed result.
///
/// Returns `None` when the content is empty or no heuristic produced
/// anything worth continuing with.
pub fn extract_partial_results(
    result: &ToolInvocationResult,
    tool_name: &str,
) -> Option<SelfHealedResult> {
    let content = result.text();
    if content.trim().is_empty() {
        return None;
    }

    let mut partial_data: Option<String> = None;
    let mut successful_parts = Vec::new();
    let mut failed_parts = Vec::new();

    // 1. Truncation marker; later heuristics see the stripped text
    let working = if content.contains(TRUNCATION_MARKER) {
        let stripped = content.replace(TRUNCATION_MARKER, "").trim().to_string();
        if !stripped.is_empty() {
            successful_parts.push(format!(
                "Received {} characters of output from '{}' before truncation",
                stripped.chars().count(),
                tool_name
            ));
            partial_data = Some(stripped.clone());
        }
        failed_parts.push("Result was truncated before completion".to_string());
        stripped
    } else {
        content
    };

    // 2. Embedded JSON fragment
    if let Some(fragment) = find_flat_json_object(&working) {
        partial_data = Some(match partial_data {
            Some(existing) => format!("{}\n{}", existing, fragment),
            None => fragment.to_string(),
        });
        successful_parts.push("Recovered a structured JSON fragment".to_string());
    }

    // 3. Data/error line partition
    let (error_lines, data_lines): (Vec<&str>, Vec<&str>) = working
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .partition(|line| is_error_line(line));

    if !data_lines.is_empty() {
        successful_parts.push(format!("Recovered {} line(s) of output", data_lines.len()));
        partial_data = Some(data_lines.join("\n"));
    }

    failed_parts.extend(
        error_lines
            .iter()
            .take(MAX_ERROR_LINES)
            .map(|line| clip_with_ellipsis(line, MAX_ERROR_LINE_CHARS)),
    );

    let has_data = partial_data.as_deref().is_some_and(|d| !d.is_empty());
    let can_continue = has_data || !successful_parts.is_empty();
    if !can_continue {
        return None;
    }

    let explanation = build_explanation(&successful_parts, &failed_parts);
    let suggestions = build_suggestions(&failed_parts, has_data);

    Some(SelfHealedResult {
        partial_data,
        successful_parts,
        failed_parts,
        explanation,
        can_continue,
        suggestions,
    })
}

fn is_error_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    ERROR_LINE_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// First `{...}` with no nested braces that parses as JSON.
///
/// Only the first balanced candidate is considered; an unparsable one ends
/// the search.
fn find_flat_json_object(text: &str) -> Option<&str> {
    let mut start = None;
    for (i, c) in text.char_indices() {
        match c {
            '{' => start = Some(i),
            '}' => {
                if let Some(s) = start {
                    let candidate = &text[s..=i];
                    return serde_json::from_str::<serde_json::Value>(candidate)
                        .ok()
                        .map(|_| candidate);
                }
            }
            _ => {}
        }
    }
    None
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_explanation(successful_parts: &[String], failed_parts: &[String]) -> String {
    let mut sections = Vec::new();
    if !successful_parts.is_empty() {
        sections.push(format!("What worked:\n{}", bullet_list(successful_parts)));
    }
    if !failed_parts.is_empty() {
        sections.push(format!("What failed:\n{}", bullet_list(failed_parts)));
    }
    sections.join("\n\n")
}

fn build_suggestions(failed_parts: &[String], has_partial_data: bool) -> Vec<String> {
    let failed = failed_parts.join("\n").to_lowercase();
    let mut suggestions = Vec::new();

    if has_partial_data {
        suggestions.push("Review the recovered data; it may already cover what you need".to_string());
    }
    if failed.contains("timeout") {
        suggestions.push("Narrow the query and process the work in smaller chunks".to_string());
    }
    if failed.contains("truncat") {
        suggestions.push("Request less data per call or use pagination".to_string());
    }
    if failed.contains("rate") || failed.contains("limit") {
        suggestions.push("Back off before retrying and reduce the request frequency".to_string());
    }
    if failed.contains("auth") || failed.contains("permission") {
        suggestions.push("Check credentials and permissions for this tool".to_string());
    }
    if failed.contains("network") || failed.contains("connection") {
        suggestions.push("Check network connectivity to the tool executor".to_string());
    }

    suggestions
}
