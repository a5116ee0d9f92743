//! Application-level configuration.
//!
//! - [`PolicyRegistry`]: retry policies that can be adjusted at runtime

pub mod policy_registry;

pub use policy_registry::PolicyRegistry;
