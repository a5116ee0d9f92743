//! Retry state tracker.
//!
//! Keyed store of [`RetryState`] per logical invocation. The invoker owns
//! one tracker (usually behind an `Arc`) and is responsible for clearing
//! every entry it creates.

use mend_domain::{ErrorKind, InvocationId, RetryDecision, RetryPolicy, RetryState};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe map from [`InvocationId`] to [`RetryState`].
///
/// A single coarse lock guards the whole map; every operation holds it
/// only for a map lookup or update.
#[derive(Debug, Default)]
pub struct RetryStateTracker {
    states: Mutex<HashMap<InvocationId, RetryState>>,
}

impl RetryStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `id` and return a snapshot of the updated state.
    ///
    /// The first call creates the state with `attempt_count = 0`; later
    /// calls increment it.
    pub fn track_retry(
        &self,
        id: &InvocationId,
        tool_name: &str,
        arguments: &HashMap<String, serde_json::Value>,
        error: ErrorKind,
    ) -> RetryState {
        let mut states = self.lock();
        match states.get_mut(id) {
            Some(state) => {
                state.record_failure(error);
                state.clone()
            }
            None => {
                let state = RetryState::first_failure(tool_name, arguments.clone(), error);
                states.insert(id.clone(), state.clone());
                state
            }
        }
    }

    pub fn get_retry_state(&self, id: &InvocationId) -> Option<RetryState> {
        self.lock().get(id).cloned()
    }

    /// Remove the state for `id`. Clearing an absent id is a no-op.
    pub fn clear_retry_state(&self, id: &InvocationId) {
        self.lock().remove(id);
    }

    /// Decide whether another attempt is allowed and how long to wait first.
    ///
    /// Denied for non-retryable errors and once `attempt_count` reaches
    /// `max_retries`. Otherwise the wait is the longer of the error's
    /// suggested delay and the policy backoff for `attempt_count`. An
    /// absent state counts as `attempt_count = 0`.
    pub fn should_retry(
        &self,
        id: &InvocationId,
        error: &ErrorKind,
        policy: &RetryPolicy,
    ) -> RetryDecision {
        if !error.is_retryable() {
            return RetryDecision::deny();
        }

        let attempt_count = self
            .lock()
            .get(id)
            .map(|state| state.attempt_count)
            .unwrap_or(0);

        if attempt_count >= policy.max_retries {
            return RetryDecision::deny();
        }

        let backoff = policy.delay_for_attempt(attempt_count);
        RetryDecision::retry_after(error.suggested_delay().max(backoff))
    }

    /// Number of invocations currently tracked.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave a half-written entry, so
    // a poisoned map is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<InvocationId, RetryState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn timeout() -> ErrorKind {
        ErrorKind::Timeout {
            tool: "search::lookup".to_string(),
        }
    }

    fn no_jitter() -> RetryPolicy {
        RetryPolicy::default().with_jitter_factor(0.0)
    }

    #[test]
    fn test_track_retry_creates_then_increments() {
        let tracker = RetryStateTracker::new();
        let id = InvocationId::new("inv-1");
        let args = HashMap::from([("q".to_string(), serde_json::json!("rust"))]);

        let first = tracker.track_retry(&id, "search::lookup", &args, timeout());
        assert_eq!(first.attempt_count, 0);
        assert_eq!(first.arguments, args);

        let second = tracker.track_retry(&id, "search::lookup", &args, timeout());
        assert_eq!(second.attempt_count, 1);
        assert_eq!(tracker.get_retry_state(&id).unwrap().attempt_count, 1);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_states_are_keyed_by_invocation() {
        let tracker = RetryStateTracker::new();
        let a = InvocationId::new("a");
        let b = InvocationId::new("b");

        tracker.track_retry(&a, "search::lookup", &HashMap::new(), timeout());
        tracker.track_retry(&a, "search::lookup", &HashMap::new(), timeout());
        tracker.track_retry(&b, "search::lookup", &HashMap::new(), timeout());

        assert_eq!(tracker.get_retry_state(&a).unwrap().attempt_count, 1);
        assert_eq!(tracker.get_retry_state(&b).unwrap().attempt_count, 0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let tracker = RetryStateTracker::new();
        let id = InvocationId::new("inv-1");
        tracker.track_retry(&id, "t", &HashMap::new(), timeout());

        tracker.clear_retry_state(&id);
        tracker.clear_retry_state(&id);
        tracker.clear_retry_state(&InvocationId::new("never-tracked"));

        assert!(tracker.get_retry_state(&id).is_none());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_permanent_errors_are_denied() {
        let tracker = RetryStateTracker::new();
        let id = InvocationId::new("inv-1");
        let tool = "fs::read".to_string();
        let permanent = [
            ErrorKind::ToolNotFound { tool: tool.clone() },
            ErrorKind::InvalidArguments {
                tool: tool.clone(),
                message: "bad".into(),
            },
            ErrorKind::ParseError {
                tool: tool.clone(),
                message: "eof".into(),
            },
            ErrorKind::ValidationFailed {
                tool,
                message: "schema".into(),
            },
        ];

        for error in permanent {
            assert_eq!(
                tracker.should_retry(&id, &error, &RetryPolicy::default()),
                RetryDecision::deny()
            );
        }
    }

    #[test]
    fn test_absent_state_counts_as_zero() {
        let tracker = RetryStateTracker::new();
        let decision = tracker.should_retry(&InvocationId::new("x"), &timeout(), &no_jitter());
        assert_eq!(decision, RetryDecision::retry_after(Duration::from_secs(1)));
    }

    #[test]
    fn test_denied_once_attempts_reach_max() {
        let tracker = RetryStateTracker::new();
        let id = InvocationId::new("inv-1");
        let policy = no_jitter().with_max_retries(2);

        tracker.track_retry(&id, "t", &HashMap::new(), timeout()); // count 0
        assert!(tracker.should_retry(&id, &timeout(), &policy).allow);
        tracker.track_retry(&id, "t", &HashMap::new(), timeout()); // count 1
        assert_eq!(
            tracker.should_retry(&id, &timeout(), &policy),
            RetryDecision::retry_after(Duration::from_secs(2))
        );
        tracker.track_retry(&id, "t", &HashMap::new(), timeout()); // count 2
        assert!(!tracker.should_retry(&id, &timeout(), &policy).allow);
    }

    #[test]
    fn test_rate_limit_retry_after_wins_over_backoff() {
        let tracker = RetryStateTracker::new();
        let id = InvocationId::new("inv-1");
        let rate_limited = ErrorKind::RateLimited {
            tool: "api".to_string(),
            retry_after: Some(Duration::from_secs(10)),
        };

        tracker.track_retry(&id, "api", &HashMap::new(), rate_limited.clone());
        tracker.track_retry(&id, "api", &HashMap::new(), rate_limited.clone());

        // Backoff for count 1 would be 2s
        let decision = tracker.should_retry(&id, &rate_limited, &no_jitter());
        assert_eq!(decision, RetryDecision::retry_after(Duration::from_secs(10)));
    }

    #[test]
    fn test_suggested_delay_used_when_longer() {
        let tracker = RetryStateTracker::new();
        let network = ErrorKind::NetworkError {
            tool: "api".to_string(),
            message: "connection reset".to_string(),
        };
        let policy = no_jitter().with_base_delay(Duration::from_millis(200));

        let decision = tracker.should_retry(&InvocationId::new("x"), &network, &policy);
        assert_eq!(decision.delay, Duration::from_secs(1));
    }
}
