//! Search API client error types.

use std::sync::Arc;

/// Errors from the site-restricted search client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// API key or engine id not configured.
    #[error("missing credentials: {0} not set")]
    MissingCredentials(&'static str),

    /// Invalid search query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid result count (must be 1-10).
    #[error("invalid count: must be 1-10")]
    InvalidCount,

    /// Authentication failed (invalid API key or engine id).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited or quota exhausted.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { SearchError::Timeout } else { SearchError::Network(Arc::new(err)) }
    }
}

impl From<SearchError> for rechtsbron_core::Error {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::MissingCredentials(_) | SearchError::AuthError => {
                rechtsbron_core::Error::SearchAuthError(err.to_string())
            }
            SearchError::RateLimited => rechtsbron_core::Error::SearchRateLimited(err.to_string()),
            SearchError::Timeout => rechtsbron_core::Error::SearchTimeout(err.to_string()),
            SearchError::InvalidQuery(msg) => rechtsbron_core::Error::InvalidInput(msg),
            SearchError::InvalidCount => rechtsbron_core::Error::InvalidInput(err.to_string()),
            SearchError::HttpError { status } => rechtsbron_core::Error::HttpError(format!("HTTP {status}")),
            SearchError::Network(_) | SearchError::Parse(_) => rechtsbron_core::Error::HttpError(err.to_string()),
        }
    }
}
