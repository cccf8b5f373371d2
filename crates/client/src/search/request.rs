//! Search API request types and validation.

use serde::Serialize;

use crate::search::SearchError;

/// Maximum query length accepted by the search API.
const MAX_QUERY_CHARS: usize = 2048;

/// Query parameters for one site-restricted search.
///
/// Credentials (`key`, `cx`) are added by the client, not carried here.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct SearchRequest {
    /// Full query string including the `site:` restriction.
    pub q: String,

    /// Number of results (1-10, default 10).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num: Option<u8>,

    /// Country boost (e.g., "nl").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gl: Option<String>,

    /// Interface language (e.g., "nl").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hl: Option<String>,

    /// Document language restriction (e.g., "lang_nl").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lr: Option<String>,
}

/// Locale and result-count hints applied to every per-domain request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHints {
    pub num: Option<u8>,
    pub gl: Option<String>,
    pub hl: Option<String>,
    pub lr: Option<String>,
}

impl SearchRequest {
    /// Build `site:<domain> <query>` with the given hints.
    pub fn site_restricted(domain: &str, query: &str, hints: &SearchHints) -> Self {
        Self {
            q: format!("site:{} {}", domain, query.trim()),
            num: hints.num,
            gl: hints.gl.clone(),
            hl: hints.hl.clone(),
            lr: hints.lr.clone(),
        }
    }

    /// Validate the search request parameters.
    ///
    /// Returns an error if any parameters are out of range or malformed.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.q.trim().is_empty() {
            return Err(SearchError::InvalidQuery("query cannot be empty".to_string()));
        }

        let chars = self.q.chars().count();
        if chars > MAX_QUERY_CHARS {
            return Err(SearchError::InvalidQuery(format!(
                "query too long: {} chars (max {})",
                chars, MAX_QUERY_CHARS
            )));
        }

        if let Some(num) = self.num
            && !(1..=10).contains(&num)
        {
            return Err(SearchError::InvalidCount);
        }

        Ok(())
    }

    /// Get the effective result count (default 10).
    pub fn get_num(&self) -> u8 {
        self.num.unwrap_or(10)
    }
}
