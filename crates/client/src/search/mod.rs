//! Site-restricted search API client.
//!
//! Provides the [`SearchProvider`] seam used by the per-domain executor and a
//! production client for the Custom Search JSON API.
//!
//! ### API contract
//!
//! - **Endpoint**: `https://www.googleapis.com/customsearch/v1` (configurable).
//! - **Authentication**: `key` and `cx` query parameters.
//! - **Query**: `site:<domain> <query>` plus result-count and locale hints.
//! - **Normalization**: `{title, link, snippet, displayLink}` records become
//!   [`RawSearchItem`]s in upstream order.
//! - **Retries**: none. Callers treat any error as "no results".

pub mod error;
pub mod request;
pub mod response;

pub use error::SearchError;
pub use request::{SearchHints, SearchRequest};
pub use response::{SearchApiItem, SearchApiResponse};

use std::sync::Arc;
use std::time::{Duration, Instant};

use rechtsbron_core::{AppConfig, RawSearchItem};
use reqwest::header;

/// Default base URL for the Custom Search JSON API.
const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "rechtsbron/0.1";

/// Upstream search boundary.
///
/// Given a request with an embedded `site:` filter, returns the hits in
/// upstream order.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawSearchItem>, SearchError>;
}

/// Search API client configuration.
#[derive(Debug, Clone)]
pub struct CustomSearchConfig {
    /// API key.
    pub api_key: String,
    /// Search engine id (`cx`).
    pub engine_id: String,
    /// Endpoint URL.
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl Default for CustomSearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            engine_id: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CustomSearchConfig {
    /// Build from application configuration.
    ///
    /// Returns `SearchError::MissingCredentials` if the key or engine id is unset.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SearchError> {
        let api_key = config
            .search_api_key
            .clone()
            .ok_or(SearchError::MissingCredentials("search_api_key"))?;
        let engine_id = config
            .search_engine_id
            .clone()
            .ok_or(SearchError::MissingCredentials("search_engine_id"))?;

        Ok(Self {
            api_key,
            engine_id,
            base_url: config.search_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// HTTP client for the Custom Search JSON API.
#[derive(Debug, Clone)]
pub struct CustomSearchClient {
    http: reqwest::Client,
    config: CustomSearchConfig,
}

impl CustomSearchClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CustomSearchConfig) -> Result<Self, SearchError> {
        if config.api_key.is_empty() {
            return Err(SearchError::MissingCredentials("search_api_key"));
        }
        if config.engine_id.is_empty() {
            return Err(SearchError::MissingCredentials("search_engine_id"));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .build()
            .map_err(|e| SearchError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CustomSearchConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl SearchProvider for CustomSearchClient {
    async fn search(&self, req: &SearchRequest) -> Result<Vec<RawSearchItem>, SearchError> {
        req.validate()?;

        let start = Instant::now();

        tracing::debug!("searching upstream: query={}", req.q);

        let http_response = self
            .http
            .get(&self.config.base_url)
            .query(&[("key", self.config.api_key.as_str()), ("cx", self.config.engine_id.as_str())])
            .query(req)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("search API response status: {}", status);

        if status == 401 || status == 403 {
            return Err(SearchError::AuthError);
        }

        if status == 429 {
            return Err(SearchError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(SearchError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let api_response: SearchApiResponse =
            serde_json::from_slice(&bytes).map_err(|e| SearchError::Parse(e.to_string()))?;
        let items = api_response.into_items();

        tracing::debug!("search completed in {:?}, {} results", start.elapsed(), items.len());

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_new_missing_key() {
        let result = CustomSearchClient::new(CustomSearchConfig::default());
        assert!(matches!(result, Err(SearchError::MissingCredentials("search_api_key"))));
    }

    #[test]
    fn test_client_new_missing_engine() {
        let config = CustomSearchConfig { api_key: "key".into(), ..Default::default() };
        let result = CustomSearchClient::new(config);
        assert!(matches!(result, Err(SearchError::MissingCredentials("search_engine_id"))));
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig {
            search_api_key: Some("key".into()),
            search_engine_id: Some("cx".into()),
            timeout_ms: 2_500,
            ..Default::default()
        };
        let config = CustomSearchConfig::from_app_config(&app).unwrap();
        assert_eq!(config.api_key, "key");
        assert_eq!(config.engine_id, "cx");
        assert_eq!(config.timeout, Duration::from_millis(2_500));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_config_from_app_config_missing() {
        let result = CustomSearchConfig::from_app_config(&AppConfig::default());
        assert!(matches!(result, Err(SearchError::MissingCredentials("search_api_key"))));
    }

    #[tokio::test]
    async fn test_client_rejects_invalid_request_before_network() {
        let config = CustomSearchConfig { api_key: "key".into(), engine_id: "cx".into(), ..Default::default() };
        let client = CustomSearchClient::new(config).unwrap();
        let req = SearchRequest { q: String::new(), ..Default::default() };

        let result = client.search(&req).await;
        assert!(matches!(result, Err(SearchError::InvalidQuery(_))));
    }
}
