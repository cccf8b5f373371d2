//! Unified error types for rechtsbron.
//!
//! Upstream search failures never reach these variants at query time; the
//! per-domain executor degrades them to empty result lists. What remains is
//! input validation, startup configuration and the search client's own
//! construction errors.

use rmcp::model::{ErrorCode, ErrorData as McpError};

use crate::types::SourceTag;

/// Unified error types for the rechtsbron pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A source tag has no domains configured.
    #[error("CONFIG_ERROR: source tag {0} has no domains")]
    EmptySiteGroup(SourceTag),

    /// A domain appears twice within the same source tag.
    #[error("CONFIG_ERROR: duplicate domain {domain} in source tag {tag}")]
    DuplicateDomain { tag: SourceTag, domain: String },

    /// Invalid configuration value.
    #[error("CONFIG_ERROR: {0}")]
    InvalidConfig(String),

    /// The concurrency gate was shut down while a task waited for a slot.
    #[error("LIMITER_CLOSED")]
    LimiterClosed,

    /// Search API authentication error.
    #[error("SEARCH_AUTH_ERROR: {0}")]
    SearchAuthError(String),

    /// Search API rate limited.
    #[error("SEARCH_RATE_LIMITED: {0}")]
    SearchRateLimited(String),

    /// Upstream call exceeded its timeout.
    #[error("SEARCH_TIMEOUT: {0}")]
    SearchTimeout(String),

    /// HTTP error response or transport failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::EmptySiteGroup(_) | Error::DuplicateDomain { .. } | Error::InvalidConfig(_) => {
                (-32002, err.to_string())
            }
            Error::LimiterClosed => (-32003, "Concurrency limiter is closed".to_string()),
            Error::SearchAuthError(msg) => (-32009, msg.clone()),
            Error::SearchRateLimited(msg) => (-32010, msg.clone()),
            Error::SearchTimeout(msg) => (-32006, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
