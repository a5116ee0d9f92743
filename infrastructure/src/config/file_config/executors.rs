//! Executor configuration from TOML (`[[executors]]` array)
//!
//! Each executor is an external command invoked once per tool call:
//!
//! ```toml
//! [[executors]]
//! name = "search"
//! command = "search-tools"
//! args = ["--json"]
//! timeout_secs = 20
//! tools = ["lookup", "suggest"]
//!
//! [executors.env]
//! SEARCH_INDEX = "/var/lib/search"
//! ```

use crate::executors::ExecutorSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default per-call timeout in seconds
pub const DEFAULT_EXECUTOR_TIMEOUT_SECS: u64 = 30;

/// Raw executor definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileExecutorConfig {
    /// Executor name; also the `server` part of `server::tool` names
    pub name: String,
    /// Program to run
    pub command: String,
    /// Arguments placed before the tool name
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra environment variables
    #[serde(default)]
    pub env: HashMap<String, String>,
    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Mark the executor running at startup
    #[serde(default = "default_auto_start")]
    pub auto_start: bool,
    /// Tool names (without prefix) this executor serves
    #[serde(default)]
    pub tools: Vec<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_EXECUTOR_TIMEOUT_SECS
}

fn default_auto_start() -> bool {
    true
}

impl FileExecutorConfig {
    pub fn to_spec(&self) -> ExecutorSpec {
        ExecutorSpec {
            name: self.name.clone(),
            command: self.command.clone(),
            args: self.args.clone(),
            env: self.env.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            auto_start: self.auto_start,
            tools: self.tools.clone(),
        }
    }
}
