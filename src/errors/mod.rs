//! Error types for the transcoding engine
//!
//! All error types use thiserror.
//! Error messages MUST NOT contain secret values.

use thiserror::Error;

/// Errors raised by the persistence collaborator
///
/// The engine never inspects or retries these; they reach the caller verbatim.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Store error: {0}")]
    Backend(String),
}

/// Top-level error type for import and export operations
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Error importing file: {0}")]
    Decode(String),

    #[error("No passwords to export")]
    NothingToExport,

    #[error("Error exporting file: {0}")]
    Encode(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TranscodeError {
    /// Build a decode error from any parser error
    pub fn decode(err: impl std::fmt::Display) -> Self {
        TranscodeError::Decode(err.to_string())
    }

    /// Build an encode error from any writer error
    pub fn encode(err: impl std::fmt::Display) -> Self {
        TranscodeError::Encode(err.to_string())
    }

    /// True when the failure was caused by the caller's input rather than infrastructure
    ///
    /// Maps to the 4xx family at the HTTP boundary.
    pub fn is_user_error(&self) -> bool {
        match self {
            TranscodeError::UnsupportedFormat(_) => true,
            TranscodeError::Decode(_) => true,
            TranscodeError::NothingToExport => true,
            TranscodeError::Encode(_) => false,
            TranscodeError::Store(_) => false,
        }
    }
}

pub type TranscodeResult<T> = Result<T, TranscodeError>;
