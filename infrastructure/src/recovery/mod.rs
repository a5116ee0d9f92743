//! Recovery adapters implementing [`RecoveryHook`](mend_application::RecoveryHook).

mod executor_hook;

pub use executor_hook::{DEFAULT_NETWORK_PAUSE, ExecutorRecoveryHook};
