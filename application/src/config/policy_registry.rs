//! Policy registry: runtime-adjustable retry policies.
//!
//! [`PolicyRegistry`] wraps [`RetryPolicies`] behind a read-write lock so a
//! host can change per-tool overrides while invocations are running. Lookups
//! return an owned [`RetryPolicy`]; an invocation resolves its policy once
//! and is unaffected by later changes.

use mend_domain::{RetryPolicies, RetryPolicy};
use std::sync::{PoisonError, RwLock};

/// Read-mostly store of the default policy and per-tool overrides.
#[derive(Debug, Default)]
pub struct PolicyRegistry {
    policies: RwLock<RetryPolicies>,
}

impl PolicyRegistry {
    pub fn new(policies: RetryPolicies) -> Self {
        Self {
            policies: RwLock::new(policies),
        }
    }

    /// Policy for `tool_name` (exact match), falling back to the default.
    pub fn policy_for(&self, tool_name: &str) -> RetryPolicy {
        self.policies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .policy_for(tool_name)
            .clone()
    }

    pub fn set_override(&self, tool_name: impl Into<String>, policy: RetryPolicy) {
        self.policies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_override(tool_name, policy);
    }

    pub fn remove_override(&self, tool_name: &str) -> Option<RetryPolicy> {
        self.policies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove_override(tool_name)
    }

    pub fn set_default(&self, policy: RetryPolicy) {
        self.policies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_default(policy);
    }

    /// Copy of the current policies.
    pub fn snapshot(&self) -> RetryPolicies {
        self.policies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_lifecycle() {
        let registry = PolicyRegistry::default();
        assert_eq!(registry.policy_for("search::lookup").max_retries, 3);

        registry.set_override("search::lookup", RetryPolicy::no_retry());
        assert_eq!(registry.policy_for("search::lookup").max_retries, 0);
        assert_eq!(registry.policy_for("search::other").max_retries, 3);

        assert!(registry.remove_override("search::lookup").is_some());
        assert_eq!(registry.policy_for("search::lookup").max_retries, 3);
    }

    #[test]
    fn test_set_default_applies_to_unconfigured_tools() {
        let registry = PolicyRegistry::new(
            RetryPolicies::default().with_override("a", RetryPolicy::default().with_max_retries(7)),
        );
        registry.set_default(RetryPolicy::default().with_max_retries(1));

        assert_eq!(registry.policy_for("a").max_retries, 7);
        assert_eq!(registry.policy_for("b").max_retries, 1);
        assert_eq!(registry.snapshot().overrides().len(), 1);
    }
}
