//! Self-healing domain module
//!
//! Last-resort salvage of a failed invocation's output. See
//! [`extract_partial_results`] for the heuristics.

pub mod extractor;

pub use extractor::{SelfHealedResult, TRUNCATION_MARKER, extract_partial_results};
