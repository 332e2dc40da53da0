//! Error types for the insight and planning engines.

use thiserror::Error;

/// Result type alias for the engine crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Planning input that was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Stock trigger selected no stocks
    #[error("no stocks selected for a stock trigger")]
    MissingStocks,

    /// KOL roster is empty
    #[error("no KOL selected")]
    MissingKols,

    /// Topic trigger selected no topics
    #[error("no topics selected for a topic trigger")]
    MissingTopics,
}

/// Engine error.
#[derive(Debug, Error)]
pub enum Error {
    /// Planner input rejected before any planning work
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Corpus too small to analyze
    #[error("Insufficient data: {context}")]
    InsufficientData { context: String },

    /// Interaction store failure
    #[error("Interaction store error: {0}")]
    Store(String),

    /// Batch worker failure
    #[error("Batch worker error: {0}")]
    Worker(String),

    /// Batch was cancelled before the worker finished
    #[error("Batch {session_id} cancelled")]
    Cancelled { session_id: String },

    /// Configuration problem
    #[error(transparent)]
    Config(#[from] kol_common::Error),
}

impl Error {
    pub(crate) fn insufficient(context: impl Into<String>) -> Self {
        Self::InsufficientData {
            context: context.into(),
        }
    }

    /// Check if this is a planner validation error.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<Error> for kol_common::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(e) => kol_common::Error::InvalidInput(e.to_string()),
            Error::InsufficientData { context } => {
                kol_common::Error::NotFound(format!("not enough data: {}", context))
            }
            Error::Store(msg) | Error::Worker(msg) => kol_common::Error::External(msg),
            Error::Cancelled { .. } => kol_common::Error::Cancelled,
            Error::Config(e) => e,
        }
    }
}
