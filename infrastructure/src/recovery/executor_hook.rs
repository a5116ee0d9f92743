//! Recovery hook backed by the executor manager.
//!
//! | Error kind | Action | Result |
//! |------------|--------|--------|
//! | `ServerNotRunning` | start the matching executor | whether it was started |
//! | `NetworkError` | pause briefly | `true` |
//! | anything else | none | `false` |

use crate::executors::ExecutorManager;
use async_trait::async_trait;
use mend_application::{RecoveryError, RecoveryHook};
use mend_domain::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default pause taken on network errors
pub const DEFAULT_NETWORK_PAUSE: Duration = Duration::from_millis(500);

/// Repairs executor-related failures between attempts
pub struct ExecutorRecoveryHook {
    manager: Arc<ExecutorManager>,
    network_pause: Duration,
}

impl ExecutorRecoveryHook {
    pub fn new(manager: Arc<ExecutorManager>) -> Self {
        Self {
            manager,
            network_pause: DEFAULT_NETWORK_PAUSE,
        }
    }

    pub fn with_network_pause(mut self, pause: Duration) -> Self {
        self.network_pause = pause;
        self
    }
}

#[async_trait]
impl RecoveryHook for ExecutorRecoveryHook {
    async fn attempt_recovery(&self, error: &ErrorKind) -> Result<bool, RecoveryError> {
        match error {
            ErrorKind::ServerNotRunning { tool } => {
                let Some(name) = self.manager.find_executor_for(tool) else {
                    debug!("No executor matches tool '{}'", tool);
                    return Ok(false);
                };
                let started = self
                    .manager
                    .start(name)
                    .map_err(|e| RecoveryError::ActionFailed(e.to_string()))?;
                if started {
                    info!("Restarted executor '{}' for tool '{}'", name, tool);
                }
                Ok(started)
            }
            ErrorKind::NetworkError { tool, .. } => {
                debug!(
                    "Pausing {:?} after network error from '{}'",
                    self.network_pause, tool
                );
                tokio::time::sleep(self.network_pause).await;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
