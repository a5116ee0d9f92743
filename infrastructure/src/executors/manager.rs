//! Executor manager: routing, lifecycle flags, and the executor port.
//!
//! Tool names route to executors in this order:
//!
//! 1. `server::tool` where `server` is an executor name
//! 2. a tool listed in an executor's `tools`
//! 3. the only executor, when exactly one is configured
//!
//! Executors are started and stopped logically: a stopped executor refuses
//! calls with "Executor '<name>' is not running", which the invoker
//! classifies as a recoverable error.

use super::error::ExecutorError;
use super::process::ProcessExecutor;
use super::spec::ExecutorSpec;
use async_trait::async_trait;
use mend_application::ToolExecutorPort;
use mend_domain::{ToolInvocationRequest, ToolInvocationResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

struct ManagedExecutor {
    executor: ProcessExecutor,
    running: AtomicBool,
}

impl ManagedExecutor {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Owns all configured executors
pub struct ExecutorManager {
    executors: HashMap<String, ManagedExecutor>,
    tool_routes: HashMap<String, String>,
}

impl ExecutorManager {
    /// Build the manager. All executors start out stopped; see
    /// [`start_auto`](Self::start_auto).
    pub fn new(specs: Vec<ExecutorSpec>) -> Result<Self, ExecutorError> {
        let mut executors = HashMap::new();
        let mut tool_routes: HashMap<String, String> = HashMap::new();

        for spec in specs {
            if spec.command.trim().is_empty() {
                return Err(ExecutorError::EmptyCommand(spec.name));
            }
            if executors.contains_key(&spec.name) {
                return Err(ExecutorError::DuplicateExecutor(spec.name));
            }
            for tool in &spec.tools {
                if let Some(first) = tool_routes.get(tool) {
                    return Err(ExecutorError::ConflictingTool {
                        tool: tool.clone(),
                        first: first.clone(),
                        second: spec.name.clone(),
                    });
                }
                tool_routes.insert(tool.clone(), spec.name.clone());
            }
            executors.insert(
                spec.name.clone(),
                ManagedExecutor {
                    executor: ProcessExecutor::new(spec),
                    running: AtomicBool::new(false),
                },
            );
        }

        Ok(Self {
            executors,
            tool_routes,
        })
    }

    /// Executor names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.executors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.executors.get(name).is_some_and(ManagedExecutor::is_running)
    }

    /// Mark an executor running after checking that its command exists.
    ///
    /// Returns `Ok(false)` if it was already running.
    pub fn start(&self, name: &str) -> Result<bool, ExecutorError> {
        let managed = self
            .executors
            .get(name)
            .ok_or_else(|| ExecutorError::UnknownExecutor(name.to_string()))?;

        if managed.is_running() {
            return Ok(false);
        }

        let command = &managed.executor.spec().command;
        if which::which(command).is_err() {
            return Err(ExecutorError::CommandNotFound {
                executor: name.to_string(),
                command: command.clone(),
            });
        }

        let started = !managed.running.swap(true, Ordering::SeqCst);
        if started {
            info!("Executor '{}' started", name);
        }
        Ok(started)
    }

    /// Mark an executor stopped. Returns `Ok(false)` if it was not running.
    pub fn stop(&self, name: &str) -> Result<bool, ExecutorError> {
        let managed = self
            .executors
            .get(name)
            .ok_or_else(|| ExecutorError::UnknownExecutor(name.to_string()))?;

        let stopped = managed.running.swap(false, Ordering::SeqCst);
        if stopped {
            info!("Executor '{}' stopped", name);
        }
        Ok(stopped)
    }

    /// Start every executor with `auto_start`, returning the ones that failed.
    pub fn start_auto(&self) -> Vec<ExecutorError> {
        self.names()
            .into_iter()
            .filter(|name| {
                self.executors
                    .get(*name)
                    .is_some_and(|m| m.executor.spec().auto_start)
            })
            .filter_map(|name| self.start(name).err())
            .collect()
    }

    /// Executor that would serve `tool_name`.
    pub fn route(&self, tool_name: &str) -> Option<&str> {
        if let Some((server, _)) = tool_name.split_once("::")
            && let Some((name, _)) = self.executors.get_key_value(server)
        {
            return Some(name.as_str());
        }

        if let Some(name) = self.tool_routes.get(tool_name) {
            return Some(name.as_str());
        }

        if self.executors.len() == 1 {
            return self.executors.keys().next().map(String::as_str);
        }

        None
    }

    /// Executor a recovery action should target for `tool_name`.
    ///
    /// Case-insensitive; an exact name match beats the `server::` prefix,
    /// which beats substring containment in either direction.
    pub fn find_executor_for(&self, tool_name: &str) -> Option<&str> {
        let tool = tool_name.to_lowercase();
        let prefix = tool.split_once("::").map(|(server, _)| server);
        let names = self.names();

        names
            .iter()
            .find(|name| name.to_lowercase() == tool)
            .or_else(|| {
                names
                    .iter()
                    .find(|name| prefix.is_some_and(|p| name.to_lowercase() == p))
            })
            .or_else(|| {
                names.iter().find(|name| {
                    let name = name.to_lowercase();
                    tool.contains(&name) || name.contains(&tool)
                })
            })
            .copied()
    }
}

#[async_trait]
impl ToolExecutorPort for ExecutorManager {
    async fn call_tool(&self, request: &ToolInvocationRequest) -> ToolInvocationResult {
        let tool = request.tool_name();

        let Some(managed) = self.route(tool).and_then(|name| self.executors.get(name)) else {
            debug!("No executor serves tool '{}'", tool);
            return ToolInvocationResult::failure(format!("Tool '{}' not found", tool));
        };

        if !managed.is_running() {
            return ToolInvocationResult::failure(format!(
                "Executor '{}' is not running",
                managed.executor.name()
            ));
        }

        debug!("Routing tool '{}' to executor '{}'", tool, managed.executor.name());
        managed.executor.run(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(specs: Vec<ExecutorSpec>) -> ExecutorManager {
        ExecutorManager::new(specs).unwrap()
    }

    fn request(tool: &str) -> ToolInvocationRequest {
        ToolInvocationRequest::new(tool, "conv-1").unwrap()
    }

    #[test]
    fn test_rejects_invalid_specs() {
        assert_eq!(
            ExecutorManager::new(vec![
                ExecutorSpec::new("search", "sh"),
                ExecutorSpec::new("search", "sh"),
            ])
            .err(),
            Some(ExecutorError::DuplicateExecutor("search".to_string()))
        );
        assert_eq!(
            ExecutorManager::new(vec![ExecutorSpec::new("search", " ")]).err(),
            Some(ExecutorError::EmptyCommand("search".to_string()))
        );
        assert!(matches!(
            ExecutorManager::new(vec![
                ExecutorSpec::new("a", "sh").with_tools(["lookup"]),
                ExecutorSpec::new("b", "sh").with_tools(["lookup"]),
            ]),
            Err(ExecutorError::ConflictingTool { .. })
        ));
    }

    #[test]
    fn test_routing_order() {
        let m = manager(vec![
            ExecutorSpec::new("search", "sh"),
            ExecutorSpec::new("files", "sh").with_tools(["read_file"]),
        ]);

        assert_eq!(m.route("search::lookup"), Some("search"));
        assert_eq!(m.route("read_file"), Some("files"));
        assert_eq!(m.route("unknown"), None);
        assert_eq!(m.route("other::lookup"), None);
    }

    #[test]
    fn test_single_executor_takes_everything() {
        let m = manager(vec![ExecutorSpec::new("only", "sh")]);
        assert_eq!(m.route("anything"), Some("only"));
        assert_eq!(m.route("x::y"), Some("only"));
    }

    #[test]
    fn test_start_and_stop() {
        let m = manager(vec![ExecutorSpec::new("shell", "sh")]);
        assert!(!m.is_running("shell"));

        assert_eq!(m.start("shell"), Ok(true));
        assert_eq!(m.start("shell"), Ok(false));
        assert!(m.is_running("shell"));

        assert_eq!(m.stop("shell"), Ok(true));
        assert_eq!(m.stop("shell"), Ok(false));
        assert!(!m.is_running("shell"));

        assert_eq!(
            m.start("nope"),
            Err(ExecutorError::UnknownExecutor("nope".to_string()))
        );
    }

    #[test]
    fn test_start_fails_for_missing_command() {
        let m = manager(vec![ExecutorSpec::new("ghost", "mend-no-such-command-xyz")]);
        assert!(matches!(
            m.start("ghost"),
            Err(ExecutorError::CommandNotFound { .. })
        ));
        assert!(!m.is_running("ghost"));
    }

    #[test]
    fn test_start_auto_skips_manual_executors() {
        let m = manager(vec![
            ExecutorSpec::new("auto", "sh"),
            ExecutorSpec::new("manual", "sh").with_auto_start(false),
            ExecutorSpec::new("ghost", "mend-no-such-command-xyz"),
        ]);

        let failures = m.start_auto();

        assert_eq!(failures.len(), 1);
        assert!(m.is_running("auto"));
        assert!(!m.is_running("manual"));
        assert!(!m.is_running("ghost"));
    }

    #[test]
    fn test_find_executor_for_recovery() {
        let m = manager(vec![
            ExecutorSpec::new("Search", "sh"),
            ExecutorSpec::new("web", "sh"),
        ]);

        assert_eq!(m.find_executor_for("search"), Some("Search"));
        assert_eq!(m.find_executor_for("SEARCH::lookup"), Some("Search"));
        assert_eq!(m.find_executor_for("web_fetch"), Some("web"));
        assert_eq!(m.find_executor_for("files::read"), None);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found() {
        let m = manager(vec![
            ExecutorSpec::new("a", "sh"),
            ExecutorSpec::new("b", "sh"),
        ]);
        let result = m.call_tool(&request("missing")).await;

        assert!(result.is_error);
        assert_eq!(result.text(), "Tool 'missing' not found");
    }

    #[tokio::test]
    async fn test_stopped_executor_refuses_calls() {
        let m = manager(vec![ExecutorSpec::new("search", "sh")]);
        let result = m.call_tool(&request("search::lookup")).await;

        assert!(result.is_error);
        assert_eq!(result.text(), "Executor 'search' is not running");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_running_executor_handles_call() {
        let m = manager(vec![
            ExecutorSpec::new("search", "sh").with_args(["-c", "echo \"called $1\"", "sh"]),
        ]);
        m.start("search").unwrap();

        let result = m.call_tool(&request("search::lookup")).await;

        assert!(result.is_success());
        assert_eq!(result.text(), "called search::lookup\n");
    }
}
