//! Per-domain search executor.
//!
//! Runs one `site:<domain> <query>` search, consulting the shared result cache
//! first and going through the shared concurrency gate on a miss. Failures of
//! any kind degrade to an empty result list so that one broken domain never
//! aborts the aggregated query.
//!
//! The cache holds raw upstream records. Verdicts are computed on every
//! access, so the current-year check follows the calendar without any cache
//! invalidation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rechtsbron_core::{ConcurrencyLimiter, FreshnessValidator, RawSearchItem, ResultCache, SearchResult, SourceTag};

use crate::search::{SearchHints, SearchProvider, SearchRequest};

/// Where a domain's results came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Cache,
    Upstream,
    /// Upstream failed or timed out; no results.
    Failed,
}

/// Results of one per-domain search.
#[derive(Debug, Clone)]
pub struct DomainSearch {
    pub domain: String,
    pub tag: SourceTag,
    pub source: FetchSource,
    pub results: Vec<SearchResult>,
}

/// Executes site-restricted searches for single domains.
#[derive(Clone)]
pub struct DomainSearcher {
    provider: Arc<dyn SearchProvider>,
    cache: Arc<ResultCache>,
    limiter: ConcurrencyLimiter,
    hints: SearchHints,
    timeout: Duration,
}

impl DomainSearcher {
    pub fn new(
        provider: Arc<dyn SearchProvider>, cache: Arc<ResultCache>, limiter: ConcurrencyLimiter, hints: SearchHints,
        timeout: Duration,
    ) -> Self {
        Self { provider, cache, limiter, hints, timeout }
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Search `domain` for `query` and label the hits with `tag`.
    ///
    /// Never fails; upstream errors yield an empty list.
    pub async fn search(
        &self, query: &str, domain: &str, tag: SourceTag, validator: &FreshnessValidator,
    ) -> Vec<SearchResult> {
        self.search_with_source(query, domain, tag, validator).await.results
    }

    /// Like [`DomainSearcher::search`], also reporting where results came from.
    pub async fn search_with_source(
        &self, query: &str, domain: &str, tag: SourceTag, validator: &FreshnessValidator,
    ) -> DomainSearch {
        let query = query.trim();

        if let Some(cached) = self.cache.get(domain, query).await {
            tracing::debug!(domain, %tag, count = cached.len(), "cache hit");
            return DomainSearch {
                domain: domain.to_string(),
                tag,
                source: FetchSource::Cache,
                results: to_results(cached, tag, validator),
            };
        }

        match self.fetch(query, domain).await {
            Some(items) => {
                self.cache.set(domain, query, items.clone()).await;
                DomainSearch {
                    domain: domain.to_string(),
                    tag,
                    source: FetchSource::Upstream,
                    results: to_results(items, tag, validator),
                }
            }
            None => DomainSearch { domain: domain.to_string(), tag, source: FetchSource::Failed, results: Vec::new() },
        }
    }

    /// Call upstream through the limiter with a timeout. None on any failure.
    async fn fetch(&self, query: &str, domain: &str) -> Option<Vec<RawSearchItem>> {
        let request = SearchRequest::site_restricted(domain, query, &self.hints);
        let start = Instant::now();

        let outcome = self
            .limiter
            .run(tokio::time::timeout(self.timeout, self.provider.search(&request)))
            .await;

        match outcome {
            Ok(Ok(Ok(items))) => {
                tracing::debug!(
                    domain,
                    count = items.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "upstream search done"
                );
                Some(items)
            }
            Ok(Ok(Err(e))) => {
                tracing::warn!(domain, error = %e, "upstream search failed; treating domain as empty");
                None
            }
            Ok(Err(_)) => {
                tracing::warn!(
                    domain,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "upstream search timed out; treating domain as empty"
                );
                None
            }
            Err(e) => {
                tracing::warn!(domain, error = %e, "could not schedule upstream search");
                None
            }
        }
    }
}

/// Attach verdicts to raw records, keeping upstream order.
fn to_results(items: Vec<RawSearchItem>, tag: SourceTag, validator: &FreshnessValidator) -> Vec<SearchResult> {
    items
        .into_iter()
        .map(|item| {
            let verdict = validator.validate(&item.snippet, &item.title);
            SearchResult {
                title: item.title,
                link: item.link,
                snippet: item.snippet,
                display_link: item.display_link,
                source: tag,
                verdict,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchError;
    use crate::testing::{Script, ScriptedProvider, item};
    use chrono::TimeZone;
    use rechtsbron_core::{CacheTtlPolicy, ManualClock};

    const DOMAIN: &str = "wetten.overheid.nl";

    fn searcher(provider: Arc<ScriptedProvider>, timeout: Duration) -> (DomainSearcher, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(chrono::Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()));
        let cache = Arc::new(ResultCache::new(CacheTtlPolicy::default(), clock.clone()));
        let searcher =
            DomainSearcher::new(provider, cache, ConcurrencyLimiter::new(2).unwrap(), SearchHints::default(), timeout);
        (searcher, clock)
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let provider = Arc::new(ScriptedProvider::new().with(
            DOMAIN,
            Script::Items(vec![item(DOMAIN, "a", "Wet", "Geldend vanaf 1 januari 2026")]),
        ));
        let (searcher, _) = searcher(provider.clone(), Duration::from_secs(1));
        let validator = FreshnessValidator::new(2026);

        let first = searcher.search_with_source("huurtoeslag", DOMAIN, SourceTag::Statutes, &validator).await;
        assert_eq!(first.source, FetchSource::Upstream);
        assert_eq!(first.results.len(), 1);
        assert_eq!(first.results[0].source, SourceTag::Statutes);
        assert!(first.results[0].verdict.is_current_year);

        let second = searcher.search_with_source("huurtoeslag", DOMAIN, SourceTag::Statutes, &validator).await;
        assert_eq!(second.source, FetchSource::Cache);
        assert_eq!(second.results, first.results);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_builds_site_restricted_query() {
        let provider = Arc::new(ScriptedProvider::new());
        let (searcher, _) = searcher(provider.clone(), Duration::from_secs(1));

        searcher.search("  boete  ", DOMAIN, SourceTag::Statutes, &FreshnessValidator::new(2026)).await;

        assert_eq!(provider.requests(), vec!["site:wetten.overheid.nl boete".to_string()]);
    }

    #[tokio::test]
    async fn test_verdict_rederived_from_cached_records() {
        let provider = Arc::new(
            ScriptedProvider::new().with(DOMAIN, Script::Items(vec![item(DOMAIN, "a", "Regeling", "Stand 2026")])),
        );
        let (searcher, _) = searcher(provider.clone(), Duration::from_secs(1));

        let now = searcher.search("q", DOMAIN, SourceTag::Statutes, &FreshnessValidator::new(2026)).await;
        assert!(now[0].verdict.is_current_year);

        let next_year = searcher.search("q", DOMAIN, SourceTag::Statutes, &FreshnessValidator::new(2027)).await;
        assert!(!next_year[0].verdict.is_current_year);
        assert_eq!(next_year[0].verdict.reason, "source dates to 2026, current year is 2027");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_upstream_error_degrades_to_empty_and_is_not_cached() {
        let provider =
            Arc::new(ScriptedProvider::new().with(DOMAIN, Script::Fail(SearchError::HttpError { status: 500 })));
        let (searcher, _) = searcher(provider.clone(), Duration::from_secs(1));
        let validator = FreshnessValidator::new(2026);

        let outcome = searcher.search_with_source("q", DOMAIN, SourceTag::Statutes, &validator).await;
        assert_eq!(outcome.source, FetchSource::Failed);
        assert!(outcome.results.is_empty());
        assert!(searcher.cache().is_empty().await);

        searcher.search("q", DOMAIN, SourceTag::Statutes, &validator).await;
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_timeout_degrades_to_empty() {
        let provider = Arc::new(ScriptedProvider::new().with(
            DOMAIN,
            Script::Delay(Duration::from_millis(500), vec![item(DOMAIN, "a", "Traag", "2026")]),
        ));
        let (searcher, _) = searcher(provider, Duration::from_millis(20));

        let outcome =
            searcher.search_with_source("q", DOMAIN, SourceTag::Statutes, &FreshnessValidator::new(2026)).await;
        assert_eq!(outcome.source, FetchSource::Failed);
        assert!(outcome.results.is_empty());
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let provider = Arc::new(ScriptedProvider::new());
        let (searcher, clock) = searcher(provider.clone(), Duration::from_secs(1));
        let validator = FreshnessValidator::new(2026);

        searcher.search("q", DOMAIN, SourceTag::Statutes, &validator).await;
        clock.advance(chrono::Duration::hours(4) + chrono::Duration::seconds(1));
        searcher.search("q", DOMAIN, SourceTag::Statutes, &validator).await;

        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_closed_limiter_degrades_to_empty() {
        let provider = Arc::new(
            ScriptedProvider::new().with(DOMAIN, Script::Items(vec![item(DOMAIN, "a", "Wet", "2026")])),
        );
        let (searcher, _) = searcher(provider.clone(), Duration::from_secs(1));
        searcher.limiter.close();

        let outcome =
            searcher.search_with_source("q", DOMAIN, SourceTag::Statutes, &FreshnessValidator::new(2026)).await;
        assert_eq!(outcome.source, FetchSource::Failed);
        assert_eq!(provider.calls(), 0);
    }
}
