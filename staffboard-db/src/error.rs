//! Error types for database operations

use thiserror::Error;

/// Database error types
#[derive(Error, Debug)]
pub enum Error {
    /// SQLx database error
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before it reached the database
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for database operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<staffboard_core::Error> for Error {
    fn from(err: staffboard_core::Error) -> Self {
        match err {
            staffboard_core::Error::NotFound(msg) => Error::NotFound(msg),
            staffboard_core::Error::InvalidArgument(msg) => Error::InvalidData(msg),
            other => Error::InvalidData(other.to_string()),
        }
    }
}

impl From<Error> for staffboard_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(msg) => staffboard_core::Error::NotFound(msg),
            Error::InvalidData(msg) => staffboard_core::Error::InvalidArgument(msg),
            Error::Sqlx(e) => staffboard_core::Error::StoreUnavailable(e.to_string()),
            Error::Migration(msg) | Error::Io(msg) => {
                staffboard_core::Error::StoreUnavailable(msg)
            }
        }
    }
}
