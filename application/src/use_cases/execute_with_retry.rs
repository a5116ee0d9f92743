//! Execute With Retry use case (the resilient invoker)
//!
//! Wraps one [`ToolExecutorPort`] call in retry, recovery and self-healing:
//!
//! ```text
//! attempt 1 ──▶ executor ──ok──▶ return
//!                  │
//!                error ──▶ classify ──▶ track ──▶ should_retry?
//!                                                   │      │
//!                                                  no     yes ──▶ recovery hook
//!                                                   │               │
//!                                                   ▼               ▼
//!                                            self-heal?     wait backoff ──▶ attempt n+1
//!                                             │      │
//!                                            yes     no
//!                                             ▼      ▼
//!                                    synthetic ok   last error (classified)
//! ```
//!
//! Retry state lives in the [`RetryStateTracker`] only for the duration of
//! one call and is removed on every exit path, including cancellation and
//! the future being dropped.

use crate::config::PolicyRegistry;
use crate::ports::attempt_logger::{AttemptEvent, AttemptLogger, NoAttemptLogger};
use crate::ports::recovery::{NoRecovery, RecoveryHook};
use crate::ports::retry_progress::RetryProgressNotifier;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::tracking::RetryStateTracker;
use crate::use_cases::shared::{cancellable_sleep, check_cancelled};
use mend_domain::{
    DomainError, ErrorKind, InvocationId, RetryPolicy, ToolInvocationRequest,
    ToolInvocationResult, UnclassifiedErrorPayload, classify, extract_partial_results,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that end an invocation without a result.
///
/// Tool failures are not errors here: they come back as a
/// [`ToolInvocationResult`] with `is_error = true`.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("Invocation cancelled")]
    Cancelled,

    #[error("Invalid retry policy for tool '{tool}': {source}")]
    InvalidPolicy {
        tool: String,
        #[source]
        source: DomainError,
    },
}

impl InvokeError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, InvokeError::Cancelled)
    }

    /// Render this error in the payload shape used for unclassified failures.
    pub fn to_payload(&self) -> UnclassifiedErrorPayload {
        UnclassifiedErrorPayload::from_error(self)
    }
}

/// Clears the invocation's retry state when dropped, so an abandoned future
/// leaves nothing behind.
struct RetryStateGuard<'a> {
    tracker: &'a RetryStateTracker,
    id: &'a InvocationId,
}

impl Drop for RetryStateGuard<'_> {
    fn drop(&mut self) {
        self.tracker.clear_retry_state(self.id);
    }
}

/// Use case for invoking a tool with retries, recovery and self-healing
pub struct ExecuteWithRetryUseCase<T: ToolExecutorPort + 'static> {
    executor: Arc<T>,
    tracker: Arc<RetryStateTracker>,
    policies: Arc<PolicyRegistry>,
    recovery: Arc<dyn RecoveryHook>,
    attempt_logger: Arc<dyn AttemptLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<T: ToolExecutorPort + 'static> Clone for ExecuteWithRetryUseCase<T> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            tracker: self.tracker.clone(),
            policies: self.policies.clone(),
            recovery: self.recovery.clone(),
            attempt_logger: self.attempt_logger.clone(),
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

impl<T: ToolExecutorPort + 'static> ExecuteWithRetryUseCase<T> {
    pub fn new(executor: Arc<T>) -> Self {
        Self {
            executor,
            tracker: Arc::new(RetryStateTracker::new()),
            policies: Arc::new(PolicyRegistry::default()),
            recovery: Arc::new(NoRecovery),
            attempt_logger: Arc::new(NoAttemptLogger),
            cancellation_token: None,
        }
    }

    /// Share a tracker with other invokers (or inspect it from tests).
    pub fn with_tracker(mut self, tracker: Arc<RetryStateTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn with_policies(mut self, policies: Arc<PolicyRegistry>) -> Self {
        self.policies = policies;
        self
    }

    pub fn with_recovery_hook(mut self, hook: Arc<dyn RecoveryHook>) -> Self {
        self.recovery = hook;
        self
    }

    pub fn with_attempt_logger(mut self, logger: Arc<dyn AttemptLogger>) -> Self {
        self.attempt_logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn tracker(&self) -> &Arc<RetryStateTracker> {
        &self.tracker
    }

    pub fn policies(&self) -> &Arc<PolicyRegistry> {
        &self.policies
    }

    /// Invoke `request.tool_name()` until it succeeds, fails permanently or
    /// runs out of retries.
    ///
    /// `policy_override` takes precedence over the registry. The returned
    /// result is either a clean success, a self-healed success
    /// (`was_self_healed()`), or the last failure with its
    /// [`ErrorKind`] attached.
    pub async fn execute(
        &self,
        request: &ToolInvocationRequest,
        policy_override: Option<&RetryPolicy>,
        progress: &dyn RetryProgressNotifier,
    ) -> Result<ToolInvocationResult, InvokeError> {
        let invocation_id = InvocationId::generate();
        let tool_name = request.tool_name();
        let policy = match policy_override {
            Some(policy) => policy.clone(),
            None => self.policies.policy_for(tool_name),
        };
        policy
            .validate()
            .map_err(|source| InvokeError::InvalidPolicy {
                tool: tool_name.to_string(),
                source,
            })?;

        let _guard = RetryStateGuard {
            tracker: &self.tracker,
            id: &invocation_id,
        };

        debug!(
            invocation_id = %invocation_id,
            "Invoking tool '{}' (max_retries={})",
            tool_name, policy.max_retries
        );

        let mut last_failure: Option<(ToolInvocationResult, ErrorKind)> = None;
        let mut attempts = 0u32;

        for attempt in 0..=policy.max_retries {
            check_cancelled(&self.cancellation_token)?;

            let attempt_number = attempt + 1;
            let delay = match &last_failure {
                Some((_, error)) if attempt > 0 => {
                    Some(backoff_delay(&policy, attempt - 1, error))
                }
                _ => None,
            };
            progress.on_attempt(attempt_number, delay);
            self.attempt_logger.log(AttemptEvent::attempt_started(
                &invocation_id,
                tool_name,
                attempt_number,
                delay,
            ));

            if let Some(delay) = delay {
                debug!("Waiting {:?} before attempt {}", delay, attempt_number);
                cancellable_sleep(delay, &self.cancellation_token).await?;
            }

            let result = self.executor.call_tool(request).await;
            attempts = attempt_number;

            if !result.is_error {
                self.tracker.clear_retry_state(&invocation_id);
                debug!(
                    "Tool '{}' succeeded on attempt {}",
                    tool_name, attempt_number
                );
                self.attempt_logger.log(AttemptEvent::succeeded(
                    &invocation_id,
                    tool_name,
                    attempt_number,
                    false,
                ));
                return Ok(result);
            }

            let error = classify(&result, tool_name);
            warn!(
                kind = error.label(),
                retryable = error.is_retryable(),
                "Tool '{}' failed on attempt {}: {}",
                tool_name,
                attempt_number,
                error
            );
            progress.on_attempt_failed(attempt_number, &error);
            self.attempt_logger
                .log(AttemptEvent::attempt_failed(&invocation_id, attempt_number, &error));

            self.tracker
                .track_retry(&invocation_id, tool_name, request.arguments(), error.clone());
            let decision = self.tracker.should_retry(&invocation_id, &error, &policy);
            last_failure = Some((result, error.clone()));

            if !decision.allow {
                debug!("Not retrying tool '{}' ({})", tool_name, error.label());
                break;
            }

            let recovered = self.run_recovery(&error).await;
            progress.on_recovery(&error, recovered);
            self.attempt_logger
                .log(AttemptEvent::recovery(&invocation_id, &error, recovered));
        }

        self.tracker.clear_retry_state(&invocation_id);

        let Some((last_result, last_error)) = last_failure else {
            return Ok(ToolInvocationResult::failure(format!(
                "Tool '{}' failed after {} attempts",
                tool_name,
                policy.max_retries + 1
            )));
        };

        if let Some(healed) = extract_partial_results(&last_result, tool_name)
            && healed.can_continue
        {
            info!(
                "Recovered partial result for tool '{}' after {} attempt(s) ({} part(s) salvaged)",
                tool_name,
                attempts,
                healed.successful_parts.len()
            );
            progress.on_self_healed(&healed);
            self.attempt_logger.log(AttemptEvent::succeeded(
                &invocation_id,
                tool_name,
                attempts,
                true,
            ));
            return Ok(
                ToolInvocationResult::self_healed(healed.render(tool_name))
                    .with_error_kind(last_error),
            );
        }

        progress.on_exhausted(attempts, &last_error);
        self.attempt_logger
            .log(AttemptEvent::exhausted(&invocation_id, attempts, &last_error));
        Ok(last_result.with_error_kind(last_error))
    }

    /// Run the recovery hook; errors count as "not recovered".
    async fn run_recovery(&self, error: &ErrorKind) -> bool {
        match self.recovery.attempt_recovery(error).await {
            Ok(recovered) => {
                debug!(
                    "Recovery for '{}' ({}): {}",
                    error.tool_name(),
                    error.label(),
                    recovered
                );
                recovered
            }
            Err(e) => {
                warn!(
                    "Recovery hook failed for '{}' ({}): {}",
                    error.tool_name(),
                    error.label(),
                    e
                );
                false
            }
        }
    }
}

/// Wait before the attempt following `attempt_index`.
///
/// Policy backoff, stretched only by an explicit rate-limit `retry_after`.
fn backoff_delay(policy: &RetryPolicy, attempt_index: u32, error: &ErrorKind) -> Duration {
    let backoff = policy.delay_for_attempt(attempt_index);
    match error {
        ErrorKind::RateLimited {
            retry_after: Some(retry_after),
            ..
        } => backoff.max(*retry_after),
        _ => backoff,
    }
}
