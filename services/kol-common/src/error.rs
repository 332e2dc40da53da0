//! Error types shared by the KOL insight services.
//!
//! Engine crates keep their own error enums and convert into [`Error`] at the
//! service boundary, where [`Error::status_code`] picks the response code.

use thiserror::Error;

use crate::validation::ConfigValidationError;

/// Result type alias using the shared error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Service-facing error.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be published or read
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration values failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// Resource not found (or not enough data to answer)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// External collaborator error (store, batch worker)
    #[error("External service error: {0}")]
    External(String),

    /// Operation was cancelled before completion
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidInput(_) => 400,
            Self::Cancelled => 409,
            Self::External(_) => 502,
            Self::Config(_) | Self::InvalidConfig(_) => 500,
        }
    }
}
