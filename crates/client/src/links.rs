//! Link canonicalization for result deduplication.
//!
//! The same document is often returned by several domains' searches (an
//! article on `rijksoverheid.nl` linking into `wetten.overheid.nl`, mirrors
//! with different fragments). Links are compared in canonical form.

/// Error type for link canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LinkError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Canonicalize a result link.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to https:// if missing
/// 3. Lowercase the host
/// 4. Remove fragment (#...)
/// 5. Keep query string intact (do not reorder)
pub fn canonicalize(input: &str) -> Result<url::Url, LinkError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(LinkError::Empty);
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let mut parsed = url::Url::parse(&url_str).map_err(|e| LinkError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(LinkError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str().map(str::to_lowercase) {
        parsed
            .set_host(Some(&host))
            .map_err(|e| LinkError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Identity of a link for deduplication.
///
/// Canonical form without a trailing slash; links that fail to parse are
/// compared by their trimmed text.
pub fn dedup_key(link: &str) -> String {
    match canonicalize(link) {
        Ok(url) => {
            let s = url.as_str();
            s.strip_suffix('/').unwrap_or(s).to_string()
        }
        Err(_) => link.trim().to_string(),
    }
}
