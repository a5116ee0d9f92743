//! Recovery hook port
//!
//! Between a failed attempt and the next one, the invoker gives a
//! [`RecoveryHook`] the chance to repair the environment (start a stopped
//! executor, wait out a flaky link). Recovery is best-effort: the invoker
//! retries whether or not it succeeded, and an `Err` is logged and treated
//! as "not recovered".

use async_trait::async_trait;
use mend_domain::ErrorKind;
use thiserror::Error;

/// Errors a recovery hook may report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecoveryError {
    #[error("Recovery action failed: {0}")]
    ActionFailed(String),

    #[error("No recovery target for tool '{0}'")]
    NoTarget(String),
}

/// Port for environment repair between attempts
#[async_trait]
pub trait RecoveryHook: Send + Sync {
    /// Try to repair the cause of `error`.
    ///
    /// Returns `Ok(true)` when an action was taken that should help the next
    /// attempt, `Ok(false)` when nothing applicable was done.
    async fn attempt_recovery(&self, error: &ErrorKind) -> Result<bool, RecoveryError>;
}

/// Hook that never recovers anything (the default).
pub struct NoRecovery;

#[async_trait]
impl RecoveryHook for NoRecovery {
    async fn attempt_recovery(&self, _error: &ErrorKind) -> Result<bool, RecoveryError> {
        Ok(false)
    }
}
