//! Retry progress reporting

pub mod reporter;
