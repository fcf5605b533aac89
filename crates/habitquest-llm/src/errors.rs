//! Error types for generative recommendation operations

use habitquest_core::{HabitError, UpstreamFailure};
use thiserror::Error;

/// Errors that can occur while asking a text model for recommendations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Provider is missing required configuration (e.g. an API key)
    #[error("Invalid model configuration: {0}")]
    ConfigurationError(String),

    /// The provider endpoint could not be reached
    #[error("Provider unreachable: {0}")]
    Unreachable(String),

    /// The provider answered with a non-success status
    #[error("API request failed with status {status}: {body}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// The response envelope did not carry any generated text
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// Parsing error when extracting structured data from generated text
    #[error("Parsing error: {0}")]
    ParsingError(String),

    /// The generated text parsed but held no recommendations
    #[error("Provider returned no recommendations")]
    EmptyContent,

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl LlmError {
    /// How this error presents to callers of the recommendation seam.
    ///
    /// Returns `None` for configuration problems, which never reached the
    /// upstream service.
    pub fn failure_kind(&self) -> Option<UpstreamFailure> {
        match self {
            LlmError::ConfigurationError(_) => None,
            LlmError::Unreachable(_) => Some(UpstreamFailure::Unreachable),
            LlmError::ApiError { .. } => Some(UpstreamFailure::Rejected),
            LlmError::MalformedResponse(_)
            | LlmError::ParsingError(_)
            | LlmError::JsonError(_) => Some(UpstreamFailure::Unparsable),
            LlmError::EmptyContent => Some(UpstreamFailure::Empty),
            LlmError::HttpError(e) => Some(if e.is_decode() {
                UpstreamFailure::Unparsable
            } else if e.is_status() {
                UpstreamFailure::Rejected
            } else {
                UpstreamFailure::Unreachable
            }),
        }
    }
}

impl From<LlmError> for HabitError {
    fn from(err: LlmError) -> Self {
        match err.failure_kind() {
            Some(kind) => HabitError::UpstreamServiceError {
                kind,
                details: err.to_string(),
            },
            None => HabitError::ConfigError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_stay_distinct() {
        let unreachable: HabitError = LlmError::Unreachable("connection refused".into()).into();
        let unparsable: HabitError = LlmError::ParsingError("no JSON array".into()).into();
        let empty: HabitError = LlmError::EmptyContent.into();
        let rejected: HabitError = LlmError::ApiError {
            status: 429,
            body: "quota".into(),
        }
        .into();

        let kind = |e: &HabitError| match e {
            HabitError::UpstreamServiceError { kind, .. } => Some(*kind),
            _ => None,
        };
        assert_eq!(kind(&unreachable), Some(UpstreamFailure::Unreachable));
        assert_eq!(kind(&unparsable), Some(UpstreamFailure::Unparsable));
        assert_eq!(kind(&empty), Some(UpstreamFailure::Empty));
        assert_eq!(kind(&rejected), Some(UpstreamFailure::Rejected));
    }

    #[test]
    fn test_configuration_error_is_not_upstream() {
        let err: HabitError = LlmError::ConfigurationError("missing key".into()).into();
        assert!(matches!(err, HabitError::ConfigError(_)));
    }

    #[test]
    fn test_json_error_counts_as_unparsable() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            LlmError::from(json_err).failure_kind(),
            Some(UpstreamFailure::Unparsable)
        );
    }
}
