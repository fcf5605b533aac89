//! Defines common error types for the HabitQuest core library.

use std::fmt;
use thiserror::Error;

/// The primary error type for HabitQuest operations.
#[derive(Error, Debug)]
pub enum HabitError {
    /// No habits were available to vectorize.
    #[error("No habits found in corpus")]
    EmptyCorpus,

    /// The queried title does not exist in the corpus snapshot.
    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    /// Error reported by an external recommendation service.
    #[error("Upstream Service Error ({kind}): {details}")]
    UpstreamServiceError {
        /// What went wrong with the upstream exchange.
        kind: UpstreamFailure,
        /// Detailed error message from the service or parser.
        details: String,
    },

    /// Error related to configuration loading or validation.
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    /// Error during file or network I/O operations.
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error during serialization or deserialization (e.g., JSON parsing).
    #[error("Serialization/Deserialization Error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// Error raised by a persistent habit store.
    #[error("Storage Error: {0}")]
    StorageError(String),

    /// Error indicating a failure during data validation.
    #[error("Validation Error ({context}): {message}")]
    ValidationError {
        /// Context or field where validation failed.
        context: String,
        /// Specific validation failure message.
        message: String,
    },

    /// Represents an unexpected internal error.
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl HabitError {
    /// Shorthand for building a [`HabitError::ValidationError`].
    pub fn validation_error(context: &str, message: &str) -> Self {
        HabitError::ValidationError {
            context: context.to_string(),
            message: message.to_string(),
        }
    }

    /// Whether the caller can recover by changing its input or seeding data.
    pub fn is_caller_recoverable(&self) -> bool {
        matches!(
            self,
            HabitError::EmptyCorpus
                | HabitError::HabitNotFound(_)
                | HabitError::ValidationError { .. }
        )
    }
}

/// Distinguishes the ways an upstream recommendation service can fail.
///
/// An empty reply is kept apart from an unparsable one so callers never
/// mistake a broken upstream for "no similar habits".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamFailure {
    /// The service could not be reached at all.
    Unreachable,
    /// The service answered with a non-success status.
    Rejected,
    /// The service answered but its content could not be parsed.
    Unparsable,
    /// The service answered with valid but empty content.
    Empty,
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpstreamFailure::Unreachable => "unreachable",
            UpstreamFailure::Rejected => "rejected",
            UpstreamFailure::Unparsable => "unparsable",
            UpstreamFailure::Empty => "empty",
        };
        f.write_str(label)
    }
}
