//! Error types for the coaching service
//!
//! One variant per failure category in the client-facing contract. Every
//! internal failure is folded into exactly one of these before it crosses
//! the API boundary.

use thiserror::Error;

/// Main error type for coaching operations
#[derive(Error, Debug)]
pub enum CoachError {
    /// Caller input violates a documented constraint; message is safe to
    /// show verbatim
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Referenced user or session data does not exist
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Transport failure or timeout reaching the generative model
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    /// Upstream quota exhausted
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Model responded but the payload violated the artifact schema
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// Malformed or empty response from the model provider
    #[error("Upstream error: {0}")]
    UpstreamError(String),
}

/// Result type alias for coaching operations
pub type Result<T> = std::result::Result<T, CoachError>;

impl CoachError {
    /// Stable machine-readable tag carried in error response bodies
    pub fn machine_tag(&self) -> &'static str {
        match self {
            CoachError::InvalidRequest(_) => "invalid_request",
            CoachError::DataUnavailable(_) => "data_unavailable",
            CoachError::Unavailable(_) => "unavailable",
            CoachError::RateLimited(_) => "rate_limited",
            CoachError::SchemaViolation(_) => "schema_violation",
            CoachError::UpstreamError(_) => "upstream_error",
        }
    }

    /// Human-readable message safe to show to the end user.
    ///
    /// Only InvalidRequest and DataUnavailable surface their detail; model
    /// failures get a generic message so raw payloads never leak.
    pub fn user_message(&self) -> String {
        match self {
            CoachError::InvalidRequest(msg) => msg.clone(),
            CoachError::DataUnavailable(msg) => msg.clone(),
            CoachError::Unavailable(_) => {
                "The AI coach is unreachable right now. Please try again later.".to_string()
            }
            CoachError::RateLimited(_) => {
                "The AI coach is busy. Please retry in a few seconds.".to_string()
            }
            CoachError::SchemaViolation(_) | CoachError::UpstreamError(_) => {
                "The AI coach returned an unusable answer. Please try again.".to_string()
            }
        }
    }

    /// Whether the caller may reasonably retry the identical request
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoachError::Unavailable(_)
                | CoachError::RateLimited(_)
                | CoachError::SchemaViolation(_)
                | CoachError::UpstreamError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_tags_are_distinct() {
        let errors = [
            CoachError::InvalidRequest("x".into()),
            CoachError::DataUnavailable("x".into()),
            CoachError::Unavailable("x".into()),
            CoachError::RateLimited("x".into()),
            CoachError::SchemaViolation("x".into()),
            CoachError::UpstreamError("x".into()),
        ];
        let mut tags: Vec<_> = errors.iter().map(|e| e.machine_tag()).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), 6);
    }

    #[test]
    fn test_invalid_request_message_is_verbatim() {
        let err = CoachError::InvalidRequest("days must be between 3 and 30".into());
        assert_eq!(err.user_message(), "days must be between 3 and 30");
    }

    #[test]
    fn test_schema_violation_never_leaks_detail() {
        let err = CoachError::SchemaViolation("raw model output: {\"oops\"".into());
        assert!(!err.user_message().contains("oops"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(CoachError::Unavailable("down".into()).is_retryable());
        assert!(CoachError::RateLimited("quota".into()).is_retryable());
        assert!(!CoachError::InvalidRequest("bad days".into()).is_retryable());
        assert!(!CoachError::DataUnavailable("no user".into()).is_retryable());
    }
}
