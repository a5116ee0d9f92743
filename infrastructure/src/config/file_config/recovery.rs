//! Recovery configuration from TOML (`[recovery]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw recovery hook settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRecoveryConfig {
    /// Run the executor recovery hook between attempts
    pub enabled: bool,
    /// Pause taken on network errors, in milliseconds
    pub network_pause_ms: u64,
}

impl Default for FileRecoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            network_pause_ms: 500,
        }
    }
}

impl FileRecoveryConfig {
    pub fn network_pause(&self) -> Duration {
        Duration::from_millis(self.network_pause_ms)
    }
}
