//! Error types for the extraction pipeline
//!
//! These are internal to the pipeline: the public `extract_bundle`
//! operation absorbs every one of them into its fallback policy and never
//! propagates an error past the crate boundary.

use thiserror::Error;

/// Errors that can occur inside a single provider attempt
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Provider call failed (missing credential, transport, or HTTP error)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Background task execution failed
    #[error("Task error: {0}")]
    Task(String),
}
