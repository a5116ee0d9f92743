//! Configuration file loading for tool-mend
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MEND_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./mend.toml` or `./.mend.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/tool-mend/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_EXECUTOR_TIMEOUT_SECS, FileConfig, FileExecutorConfig, FileLoggingConfig,
    FileOutputConfig, FileRecoveryConfig, FileRetryConfig, FileRetryOverride,
};
pub use loader::ConfigLoader;
