//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for invocation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with status marks
    Text,
    /// JSON output
    Json,
}

impl From<OutputFormat> for mend_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => mend_domain::OutputFormat::Text,
            OutputFormat::Json => mend_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for tool-mend
#[derive(Parser, Debug)]
#[command(name = "mend")]
#[command(author, version, about = "Resilient remote tool invocation with retry and self-healing")]
#[command(long_about = r#"
tool-mend invokes a tool through a configured executor and keeps the call alive:

1. Failures are classified (timeout, rate limit, network, ...)
2. Transient failures are retried with exponential backoff and jitter
3. A stopped executor is restarted between attempts
4. When retries run out, usable partial output is salvaged

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./mend.toml         Project-level config
3. ~/.config/tool-mend/config.toml   Global config

Example:
  mend invoke search::lookup --arg query=rust --arg limit=5
  mend -o json invoke files::read --arg path=README.md
  mend --show-config
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (overrides [output].format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Directory for daily-rotated diagnostic logs (overrides [logging].log_dir)
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Invoke a tool with retry, recovery and self-healing
    Invoke(InvokeArgs),
}

#[derive(Args, Debug)]
pub struct InvokeArgs {
    /// Tool to invoke, e.g. `search::lookup`
    pub tool: String,

    /// Tool argument as KEY=VALUE; VALUE is parsed as JSON when possible
    #[arg(short, long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub args: Vec<(String, serde_json::Value)>,

    /// Caller context identifier
    #[arg(long, value_name = "ID", default_value = "cli")]
    pub context: String,

    /// Override the configured retry limit for this call
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,
}

/// Parse a `KEY=VALUE` pair. Values that are not valid JSON stay strings.
pub fn parse_key_value(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
