//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: UTF-8 safe clipping helpers used by the self-healing heuristics

pub mod error;
pub mod string;
