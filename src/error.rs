//! Error types shared by the fetcher, the resolver and the drill-down views.
//!
//! Every variant is scoped to the view or fetch that produced it. Nothing here is
//! fatal to the process: callers surface the message and let the user retry.

use thiserror::Error;

/// Errors returned by timeline operations.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// The hub request failed (network, HTTP status or GraphQL error).
    #[error("query failed: {0}")]
    Query(String),
    /// Resolving a content reference failed.
    #[error("failed to fetch content {content_ref}: {message}")]
    Content { content_ref: String, message: String },
    /// An expected record or field does not exist.
    #[error("{0}")]
    NotFound(String),
    /// A payload was fetched but does not have the expected shape.
    #[error("malformed document: {0}")]
    Malformed(String),
    /// Invalid configuration value.
    #[error("invalid config: {0}")]
    Config(String),
}

impl TimelineError {
    pub fn content(content_ref: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Content { content_ref: content_ref.into(), message: message.into() }
    }

    /// True for failures that mean "it isn't there" rather than "it could not be fetched".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, TimelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_error_message_includes_reference() {
        let err = TimelineError::content("bafy123", "HTTP 404");
        assert_eq!(err.to_string(), "failed to fetch content bafy123: HTTP 404");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_message_is_verbatim() {
        let err = TimelineError::NotFound("Original proposal not found".to_string());
        assert_eq!(err.to_string(), "Original proposal not found");
        assert!(err.is_not_found());
    }
}
