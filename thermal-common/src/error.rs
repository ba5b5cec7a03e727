//! Common error types for the thermal viewer

use thiserror::Error;

/// Common result type for thermal viewer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds shared by the core pipeline, the record store adapter and the API
#[derive(Error, Debug)]
pub enum Error {
    /// Upstream record store or object store read failed or returned malformed data
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// A required aggregate cannot be computed because its input set is empty
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database operation error outside the record-store query path (schema setup)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap any upstream failure as [`Error::SourceUnavailable`]
    pub fn unavailable(source: impl std::fmt::Display) -> Self {
        Error::SourceUnavailable(source.to_string())
    }
}
