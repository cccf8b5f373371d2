//! Verified search workflow.
//!
//! Fans one query out to every `(tag, domain)` pair of the site registry,
//! merges the per-domain hits in registry order, removes duplicate links and
//! applies the current-year filter before rendering the evidence bundle.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use rechtsbron_core::{
    AppConfig, Clock, ConcurrencyLimiter, Error, FreshnessValidator, HistoricalQueryDetector, ResultCache,
    SearchResult, SiteRegistry, SourceTag, SystemClock,
};
use serde::Serialize;
use tokio::task::JoinSet;

use crate::executor::{DomainSearch, DomainSearcher, FetchSource};
use crate::format::{OUTDATED_NOTICE, format_evidence};
use crate::links::dedup_key;
use crate::search::{CustomSearchClient, CustomSearchConfig, SearchHints, SearchProvider};

/// Per-query bookkeeping, used for logging and tool output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueryStats {
    pub domains_searched: usize,
    pub cache_hits: usize,
    pub domains_failed: usize,
}

/// Outcome of one verified search.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedResultSet {
    pub query: String,
    pub current_year: i32,
    pub is_historical_query: bool,
    /// Deduplicated results of every searched tag, in upstream order.
    pub per_tag_results: BTreeMap<SourceTag, Vec<SearchResult>>,
    pub total_count: usize,
    pub current_year_count: usize,
    pub outdated_count: usize,
    /// Number of results rendered into `combined_evidence_text`.
    pub selected_count: usize,
    pub combined_evidence_text: String,
    pub stats: QueryStats,
}

/// The full pipeline: registry, per-domain executor and freshness filter.
#[derive(Clone)]
pub struct VerifiedSearch {
    searcher: DomainSearcher,
    registry: Arc<SiteRegistry>,
    detector: Arc<HistoricalQueryDetector>,
    validator: Arc<FreshnessValidator>,
    clock: Arc<dyn Clock>,
}

impl VerifiedSearch {
    pub fn new(searcher: DomainSearcher, registry: SiteRegistry, clock: Arc<dyn Clock>) -> Self {
        let year = clock.current_year();
        Self {
            searcher,
            registry: Arc::new(registry),
            detector: Arc::new(HistoricalQueryDetector::default()),
            validator: Arc::new(FreshnessValidator::new(year)),
            clock,
        }
    }

    /// Production pipeline backed by the Custom Search client.
    ///
    /// # Errors
    ///
    /// Fails on missing credentials, an invalid site registry or a zero
    /// concurrency limit.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let client = CustomSearchClient::new(CustomSearchConfig::from_app_config(config)?)?;
        Self::with_provider(config, Arc::new(client), Arc::new(SystemClock))
    }

    /// Pipeline over an arbitrary provider and clock, configured from `config`.
    pub fn with_provider(
        config: &AppConfig, provider: Arc<dyn SearchProvider>, clock: Arc<dyn Clock>,
    ) -> Result<Self, Error> {
        let registry = config.site_registry()?;
        let limiter = ConcurrencyLimiter::new(config.max_concurrency)?;
        let cache = Arc::new(ResultCache::new(config.cache_ttl.to_policy(), clock.clone()));
        let hints = SearchHints {
            num: Some(config.results_per_domain),
            gl: Some(config.country.clone()),
            hl: Some(config.interface_language.clone()),
            lr: Some(config.search_language.clone()),
        };
        let searcher = DomainSearcher::new(provider, cache, limiter, hints, config.timeout());

        Ok(Self::new(searcher, registry, clock))
    }

    /// Replace the outdated-term deny list and qualifiers used for verdicts.
    pub fn with_validator(mut self, validator: FreshnessValidator) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    pub fn with_detector(mut self, detector: HistoricalQueryDetector) -> Self {
        self.detector = Arc::new(detector);
        self
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        self.searcher.cache()
    }

    pub fn registry(&self) -> &SiteRegistry {
        &self.registry
    }

    /// Search every source tag.
    pub async fn run(&self, query: &str) -> Result<AggregatedResultSet, Error> {
        self.run_for_tags(query, &SourceTag::ALL).await
    }

    /// Search only `tags`. Tag order in the output follows [`SourceTag::ALL`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for a blank query or an empty tag list.
    /// Upstream failures never surface here; they only shrink the result set.
    pub async fn run_for_tags(&self, query: &str, tags: &[SourceTag]) -> Result<AggregatedResultSet, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("query cannot be empty".to_string()));
        }
        if tags.is_empty() {
            return Err(Error::InvalidInput("at least one source tag is required".to_string()));
        }

        let start = Instant::now();
        let is_historical_query = self.detector.is_historical(query);
        let current_year = self.clock.current_year();
        let validator = Arc::new(self.validator.as_ref().clone().with_current_year(current_year));

        let selected_tags: Vec<SourceTag> = SourceTag::ALL.into_iter().filter(|t| tags.contains(t)).collect();
        let outcomes = self.fan_out(query, &selected_tags, &validator).await;

        let mut stats = QueryStats::default();
        let mut per_tag_results: BTreeMap<SourceTag, Vec<SearchResult>> =
            selected_tags.iter().map(|tag| (*tag, Vec::new())).collect();
        let mut seen = HashSet::new();

        for outcome in outcomes {
            stats.domains_searched += 1;
            match outcome {
                Some(DomainSearch { source: FetchSource::Cache, .. }) => stats.cache_hits += 1,
                Some(DomainSearch { source: FetchSource::Failed, .. }) | None => stats.domains_failed += 1,
                _ => {}
            }
            let Some(search) = outcome else { continue };

            let bucket = per_tag_results.entry(search.tag).or_default();
            for result in search.results {
                if seen.insert(dedup_key(&result.link)) {
                    bucket.push(result);
                }
            }
        }

        let all: Vec<&SearchResult> = per_tag_results.values().flatten().collect();
        let total_count = all.len();
        let current_year_count = all.iter().filter(|r| r.is_current()).count();
        let outdated_count = total_count - current_year_count;

        let selected: Vec<SearchResult> = all
            .into_iter()
            .filter(|r| is_historical_query || r.is_current())
            .cloned()
            .collect();

        let combined_evidence_text = if !is_historical_query && total_count > 0 && selected.is_empty() {
            OUTDATED_NOTICE.to_string()
        } else {
            format_evidence(&selected, current_year)
        };

        tracing::info!(
            query,
            current_year,
            historical = is_historical_query,
            total = total_count,
            current = current_year_count,
            outdated = outdated_count,
            selected = selected.len(),
            domains = stats.domains_searched,
            cache_hits = stats.cache_hits,
            failed = stats.domains_failed,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "verified search complete"
        );

        Ok(AggregatedResultSet {
            query: query.to_string(),
            current_year,
            is_historical_query,
            per_tag_results,
            total_count,
            current_year_count,
            outdated_count,
            selected_count: selected.len(),
            combined_evidence_text,
            stats,
        })
    }

    /// One task per `(tag, domain)` pair; results come back in registry order.
    ///
    /// A task that panicked yields `None` at its position.
    async fn fan_out(
        &self, query: &str, tags: &[SourceTag], validator: &Arc<FreshnessValidator>,
    ) -> Vec<Option<DomainSearch>> {
        let pairs: Vec<(SourceTag, String)> = self
            .registry
            .pairs()
            .filter(|(tag, _)| tags.contains(tag))
            .map(|(tag, domain)| (tag, domain.to_string()))
            .collect();

        let mut slots: Vec<Option<DomainSearch>> = Vec::with_capacity(pairs.len());
        slots.resize_with(pairs.len(), || None);

        let mut set = JoinSet::new();
        for (index, (tag, domain)) in pairs.into_iter().enumerate() {
            let searcher = self.searcher.clone();
            let validator = Arc::clone(validator);
            let query = query.to_string();
            set.spawn(async move { (index, searcher.search_with_source(&query, &domain, tag, &validator).await) });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, search)) => slots[index] = Some(search),
                Err(e) => tracing::error!(error = %e, "domain search task failed"),
            }
        }

        slots
    }
}
