//! CLI entrypoint for tool-mend
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use mend_application::{
    ExecuteWithRetryUseCase, NoRetryProgress, PolicyRegistry, RecoveryHook,
    RetryProgressNotifier,
};
use mend_domain::ToolInvocationRequest;
use mend_infrastructure::{ConfigLoader, ExecutorManager, ExecutorRecoveryHook, JsonlAttemptLogger};
use mend_presentation::{
    Cli, Command, InvokeArgs, OutputConfig, ProgressReporter, ResultFormatter, SimpleProgress,
    formatter_for,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Exit code when the tool call itself failed
const EXIT_TOOL_FAILED: u8 = 1;
/// Exit code for engine and configuration errors
const EXIT_ENGINE_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ENGINE_ERROR)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    if cli.show_config {
        for line in ConfigLoader::config_sources() {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    // Keep the guard alive so buffered file logs are flushed on exit
    let log_dir = cli.log_dir.clone().or_else(|| config.logging.log_dir.clone());
    let _log_guard = init_logging(cli.verbose, log_dir.as_deref());

    info!("Starting tool-mend");

    let output = OutputConfig::from_file(config.output.format, config.output.color).with_cli(&cli);
    if !output.color {
        colored::control::set_override(false);
    }
    let formatter = formatter_for(output.format);

    let issues = config.validate();
    if !issues.is_empty() {
        eprintln!("{}", formatter.format_issues(&issues));
    }
    if issues.iter().any(|issue| issue.is_error()) {
        bail!("Configuration is invalid");
    }

    let Some(Command::Invoke(args)) = cli.command else {
        bail!("No command given. Try 'mend invoke <tool>' or 'mend --help'.");
    };

    // === Dependency Injection ===
    let specs = config.executors.iter().map(|e| e.to_spec()).collect();
    let manager = Arc::new(ExecutorManager::new(specs).context("Invalid executor setup")?);
    for error in manager.start_auto() {
        warn!("Executor not started: {}", error);
    }

    let mut use_case = ExecuteWithRetryUseCase::new(manager.clone())
        .with_policies(Arc::new(PolicyRegistry::new(config.retry_policies())));

    if config.recovery.enabled {
        let hook: Arc<dyn RecoveryHook> = Arc::new(
            ExecutorRecoveryHook::new(manager).with_network_pause(config.recovery.network_pause()),
        );
        use_case = use_case.with_recovery_hook(hook);
    }

    if let Some(path) = &config.logging.attempt_log
        && let Some(logger) = JsonlAttemptLogger::new(path)
    {
        info!("Attempt log: {}", logger.path().display());
        use_case = use_case.with_attempt_logger(Arc::new(logger));
    }

    let cancellation = CancellationToken::new();
    let ctrl_c_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });
    let use_case = use_case.with_cancellation(cancellation);

    invoke(&use_case, args, &output, cli.verbose, formatter.as_ref()).await
}

async fn invoke(
    use_case: &ExecuteWithRetryUseCase<ExecutorManager>,
    args: InvokeArgs,
    output: &OutputConfig,
    verbose: u8,
    formatter: &dyn ResultFormatter,
) -> Result<ExitCode> {
    let request = ToolInvocationRequest::new(args.tool, args.context)?
        .with_arguments(args.args.into_iter().collect());

    let policy_override = args.max_retries.map(|max| {
        use_case
            .policies()
            .policy_for(request.tool_name())
            .with_max_retries(max)
    });

    let outcome = {
        let progress: Box<dyn RetryProgressNotifier> = if !output.show_progress {
            Box::new(NoRetryProgress)
        } else if verbose > 0 {
            // Log lines and a spinner interleave badly
            Box::new(SimpleProgress)
        } else {
            Box::new(ProgressReporter::new(request.tool_name()))
        };
        use_case
            .execute(&request, policy_override.as_ref(), progress.as_ref())
            .await
    };

    match outcome {
        Ok(result) => {
            println!("{}", formatter.format_result(&request, &result));
            if result.is_success() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(EXIT_TOOL_FAILED))
            }
        }
        Err(e) => {
            println!("{}", formatter.format_error(&e));
            Ok(ExitCode::from(EXIT_ENGINE_ERROR))
        }
    }
}

/// Initialize logging based on verbosity level, optionally mirrored to a
/// daily-rotated file.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir.map(open_log_file) {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("Warning: file logging disabled: {}", e);
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn open_log_file(dir: &Path) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("mend")
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("cannot write logs to {}", dir.display()))
}
