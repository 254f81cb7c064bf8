//! Common error types for pvscan

use thiserror::Error;

/// Common result type for pvscan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the pvscan crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timestamp text did not match the expected format
    #[error("Invalid timestamp '{value}' (expected format '{format}')")]
    InvalidTimestamp { value: String, format: String },
}
