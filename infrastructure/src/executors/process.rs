//! Process-backed executor.
//!
//! One child process per call: `command args... <tool-name>`, with the
//! request as JSON on stdin:
//!
//! ```json
//! {"tool": "search::lookup", "arguments": {"query": "rust"}, "context_id": "conv-1"}
//! ```
//!
//! Each stdout line becomes one content segment. A non-zero exit status
//! makes the result an error whose segments are stdout followed by stderr.

use super::spec::ExecutorSpec;
use mend_domain::core::string::truncate_bytes;
use mend_domain::{
    TRUNCATION_MARKER, ToolInvocationRequest, ToolInvocationResult, UnclassifiedErrorPayload,
};
use std::process::{Output, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Maximum output size kept from one call (1 MB)
pub const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// Runs one configured command per tool call
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    spec: ExecutorSpec,
}

impl ProcessExecutor {
    pub fn new(spec: ExecutorSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &ExecutorSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Run the command for one attempt. Never fails; problems are reported
    /// as failed results.
    pub async fn run(&self, request: &ToolInvocationRequest) -> ToolInvocationResult {
        let tool = request.tool_name();

        let mut cmd = Command::new(&self.spec.command);
        cmd.args(&self.spec.args)
            .arg(tool)
            .envs(&self.spec.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(
                    "Failed to spawn executor '{}' ({}): {}",
                    self.spec.name, self.spec.command, e
                );
                return UnclassifiedErrorPayload::new(format!(
                    "Failed to spawn executor '{}': {}",
                    self.spec.name, e
                ))
                .into_result();
            }
        };

        let input = request_json(request);
        let stdin = child.stdin.take();
        let run = async move {
            if let Some(mut stdin) = stdin {
                // The tool may exit without reading its input
                if let Err(e) = stdin.write_all(input.as_bytes()).await {
                    debug!("Executor stdin closed early: {}", e);
                }
            }
            child.wait_with_output().await
        };

        match tokio::time::timeout(self.spec.timeout, run).await {
            Err(_) => {
                warn!(
                    "Tool '{}' timed out after {:?} (executor '{}')",
                    tool, self.spec.timeout, self.spec.name
                );
                ToolInvocationResult::failure(format!(
                    "Tool '{}' timed out after {}s",
                    tool,
                    self.spec.timeout.as_secs()
                ))
            }
            Ok(Err(e)) => UnclassifiedErrorPayload::from_error(&e).into_result(),
            Ok(Ok(output)) => output_to_result(output),
        }
    }
}

fn request_json(request: &ToolInvocationRequest) -> String {
    serde_json::json!({
        "tool": request.tool_name(),
        "arguments": request.arguments(),
        "context_id": request.context_id().as_str(),
    })
    .to_string()
}

fn output_to_result(output: Output) -> ToolInvocationResult {
    let is_error = !output.status.success();
    let stdout = String::from_utf8_lossy(&output.stdout);

    let mut segments = split_lines(&stdout);
    if is_error {
        let stderr = String::from_utf8_lossy(&output.stderr);
        segments.extend(split_lines(&stderr));
        if segments.is_empty() {
            segments.push(format!(
                "Executor exited with code {}",
                output
                    .status
                    .code()
                    .map_or_else(|| "unknown".to_string(), |c| c.to_string())
            ));
        }
    }

    ToolInvocationResult::from_segments(cap_segments(segments, MAX_OUTPUT_SIZE), is_error)
}

fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(String::from).collect()
}

/// Keep at most `max_bytes` of content, marking the cut.
fn cap_segments(segments: Vec<String>, max_bytes: usize) -> Vec<String> {
    let mut kept = Vec::with_capacity(segments.len());
    let mut used = 0usize;

    for segment in segments {
        if used + segment.len() <= max_bytes {
            used += segment.len();
            kept.push(segment);
            continue;
        }
        let head = truncate_bytes(&segment, max_bytes - used);
        if !head.is_empty() {
            kept.push(head.to_string());
        }
        kept.push(format!("\n{}", TRUNCATION_MARKER));
        break;
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cap_segments_marks_cut() {
        let segments = vec!["abcd\n".to_string(), "efgh\n".to_string()];
        assert_eq!(cap_segments(segments.clone(), 100), segments);

        let capped = cap_segments(segments, 7);
        assert_eq!(capped, vec!["abcd\n", "ef", "\n[truncated]"]);
    }

    #[test]
    fn test_split_lines_keeps_newlines() {
        assert_eq!(split_lines("a\nb\n"), vec!["a\n", "b\n"]);
        assert_eq!(split_lines("a\nb"), vec!["a\n", "b"]);
        assert!(split_lines("").is_empty());
    }

    #[cfg(unix)]
    fn sh(script: &str) -> ProcessExecutor {
        ProcessExecutor::new(
            ExecutorSpec::new("test", "sh").with_args(["-c", script, "sh"]),
        )
    }

    fn request() -> ToolInvocationRequest {
        ToolInvocationRequest::new("search::lookup", "conv-1")
            .unwrap()
            .with_arg("query", "rust")
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_lines_become_segments() {
        let executor = sh(r#"cat; echo; echo "tool=$1""#);
        let result = executor.run(&request()).await;

        assert!(result.is_success());
        assert_eq!(result.content_segments.len(), 2);
        let input: serde_json::Value =
            serde_json::from_str(result.content_segments[0].trim()).unwrap();
        assert_eq!(input["tool"], "search::lookup");
        assert_eq!(input["arguments"]["query"], "rust");
        assert_eq!(input["context_id"], "conv-1");
        assert_eq!(result.content_segments[1], "tool=search::lookup\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_error_with_stderr() {
        let executor = sh("echo partial; echo boom >&2; exit 3");
        let result = executor.run(&request()).await;

        assert!(result.is_error);
        assert_eq!(result.content_segments, vec!["partial\n", "boom\n"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_silent_failure_reports_exit_code() {
        let executor = sh("exit 7");
        let result = executor.run(&request()).await;

        assert!(result.is_error);
        assert_eq!(result.text(), "Executor exited with code 7");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_env_is_passed() {
        let executor = ProcessExecutor::new(
            ExecutorSpec::new("test", "sh")
                .with_args(["-c", "echo \"$MEND_TEST_VALUE\"", "sh"])
                .with_env("MEND_TEST_VALUE", "forty-two"),
        );
        let result = executor.run(&request()).await;
        assert_eq!(result.text(), "forty-two\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_message() {
        let executor = ProcessExecutor::new(
            ExecutorSpec::new("test", "sh")
                .with_args(["-c", "sleep 5", "sh"])
                .with_timeout(Duration::from_secs(1)),
        );
        let result = executor.run(&request()).await;

        assert!(result.is_error);
        assert_eq!(result.text(), "Tool 'search::lookup' timed out after 1s");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_large_output_is_truncated() {
        let executor = sh("head -c 2000000 /dev/zero | tr '\\0' 'a'");
        let result = executor.run(&request()).await;

        let text = result.text();
        assert!(text.ends_with(TRUNCATION_MARKER));
        assert!(text.len() <= MAX_OUTPUT_SIZE + TRUNCATION_MARKER.len() + 1);
    }

    #[tokio::test]
    async fn test_spawn_failure_uses_unclassified_payload() {
        let executor =
            ProcessExecutor::new(ExecutorSpec::new("ghost", "/nonexistent/mend-test-executor"));
        let result = executor.run(&request()).await;

        assert!(result.is_error);
        let payload: serde_json::Value = serde_json::from_str(&result.text()).unwrap();
        assert_eq!(payload["type"], "execution_error");
        assert!(
            payload["message"]
                .as_str()
                .unwrap()
                .contains("Failed to spawn executor 'ghost'")
        );
    }
}
