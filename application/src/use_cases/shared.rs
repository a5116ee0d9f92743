//! Shared utilities for use cases.
//!
//! Cancellation checking and a cancellable sleep for backoff waits.

use crate::use_cases::execute_with_retry::InvokeError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(InvokeError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), InvokeError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(InvokeError::Cancelled);
    }
    Ok(())
}

/// Sleep for `delay`, returning early with `Err(InvokeError::Cancelled)`
/// if the token fires first.
pub(crate) async fn cancellable_sleep(
    delay: Duration,
    token: &Option<CancellationToken>,
) -> Result<(), InvokeError> {
    match token {
        Some(token) => {
            tokio::select! {
                _ = token.cancelled() => Err(InvokeError::Cancelled),
                _ = tokio::time::sleep(delay) => Ok(()),
            }
        }
        None => {
            tokio::time::sleep(delay).await;
            Ok(())
        }
    }
}
