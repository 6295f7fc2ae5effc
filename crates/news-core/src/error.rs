//! Error types for the news service

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NewsError>;

#[derive(Error, Debug)]
pub enum NewsError {
    /// A required field or request body was missing.
    #[error("{0}")]
    Validation(String),

    #[error("News item not found: {0}")]
    NotFound(i64),

    /// The store stayed unreachable for the whole retry budget.
    #[error("Database connection failed after {attempts} attempt(s): {message}")]
    ConnectionFailed { attempts: u32, message: String },

    /// A query failed after a connection was established.
    #[error("Database error: {0}")]
    Backend(String),
}

impl NewsError {
    pub fn validation(message: impl Into<String>) -> Self {
        NewsError::Validation(message.into())
    }

    pub fn backend(message: impl std::fmt::Display) -> Self {
        NewsError::Backend(message.to_string())
    }

    /// Whether the error was caused by the caller rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, NewsError::Validation(_) | NewsError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(NewsError::NotFound(7).to_string(), "News item not found: 7");
        assert_eq!(
            NewsError::validation("title is required").to_string(),
            "title is required"
        );

        let err = NewsError::ConnectionFailed {
            attempts: 5,
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Database connection failed after 5 attempt(s): connection refused"
        );
    }

    #[test]
    fn test_client_errors() {
        assert!(NewsError::NotFound(1).is_client_error());
        assert!(NewsError::validation("missing body").is_client_error());
        assert!(!NewsError::backend("syntax error").is_client_error());
        assert!(!NewsError::ConnectionFailed {
            attempts: 1,
            message: String::new()
        }
        .is_client_error());
    }
}
