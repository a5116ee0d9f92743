//! Use cases (application services)

pub mod execute_with_retry;
pub(crate) mod shared;
