//! Error types for Staffboard

use thiserror::Error;

/// Result type alias for Staffboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Staffboard operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing input, such as an empty staff identifier
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced review does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The review store could not answer a query
    #[error("Review store unavailable: {0}")]
    StoreUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
