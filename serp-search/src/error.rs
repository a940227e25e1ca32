//! Error types for the serp-search crate.
//!
//! All errors use stable string messages suitable for display to users.
//! No API keys appear in error messages.

/// Errors that can occur while querying the search provider.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Missing or invalid configuration, such as an absent API key or
    /// search engine id.
    #[error("config error: {0}")]
    Config(String),

    /// The HTTP request to the provider failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider-supplied message, or the raw body when none was given.
        message: String,
    },

    /// The provider response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl SearchError {
    /// Whether this error came from missing or invalid configuration rather
    /// than from talking to the provider.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Convenience type alias for serp-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_config() {
        let err = SearchError::Config("API key is not defined".into());
        assert_eq!(err.to_string(), "config error: API key is not defined");
    }

    #[test]
    fn display_http() {
        let err = SearchError::Http("connection refused".into());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }

    #[test]
    fn display_api() {
        let err = SearchError::Api {
            status: 403,
            message: "Daily Limit Exceeded".into(),
        };
        assert_eq!(err.to_string(), "API error (403): Daily Limit Exceeded");
    }

    #[test]
    fn display_parse() {
        let err = SearchError::Parse("expected value at line 1".into());
        assert_eq!(err.to_string(), "parse error: expected value at line 1");
    }

    #[test]
    fn config_classification() {
        assert!(SearchError::Config("x".into()).is_config());
        assert!(!SearchError::Http("x".into()).is_config());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
