//! Error types for the plant pipeline
//!
//! Every fatal path in the pipeline maps onto one of these classes; the
//! orchestrator returns them up to `main`, which is the only place that
//! converts a failure into a process exit status.

use thiserror::Error;

/// Main error type for the plant pipeline
#[derive(Error, Debug)]
pub enum PlantError {
    /// Configuration file missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model runtime not installed or not running
    #[error("Environment error: {0}")]
    Environment(String),

    /// Model could not be resolved or pulled
    #[error("Model resolution error: {0}")]
    ModelResolution(String),

    /// Workspace or file write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive stream failure
    #[error("Packaging error: {0}")]
    Packaging(String),

    /// Serialization errors (generated JSON documents)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for plant operations
pub type Result<T> = std::result::Result<T, PlantError>;

impl PlantError {
    /// Exit status for this error when it reaches the process boundary
    pub fn exit_code(&self) -> i32 {
        1
    }
}
