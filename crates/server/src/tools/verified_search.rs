//! verified_search tool implementation.
//!
//! Searches the verified legal sources and returns the current-year evidence
//! bundle together with the counts behind it.

use std::collections::BTreeMap;

use rechtsbron_client::VerifiedSearch;
use rechtsbron_core::{Error, SearchResult, SourceTag};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for verified_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct VerifiedSearchParams {
    /// Question or search terms (required).
    pub query: String,

    /// Restrict the search to these source categories. All categories when omitted.
    #[serde(default)]
    pub tags: Option<Vec<SourceTag>>,
}

/// Output structure for verified_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VerifiedSearchOutput {
    /// The query as searched.
    pub query: String,
    /// Year the freshness check was made against.
    pub current_year: i32,
    /// Whether the query asks about the past; outdated sources are kept if so.
    pub is_historical_query: bool,
    /// Unique results across all searched sources.
    pub total_results: usize,
    pub current_year_results: usize,
    pub outdated_results: usize,
    /// Results included in `evidence`.
    pub selected_results: usize,
    /// Evidence bundle for answering, or a fixed notice when nothing usable was found.
    pub evidence: String,
    /// Every unique result with its freshness verdict, per source category.
    pub results_by_tag: BTreeMap<SourceTag, Vec<SearchResult>>,
}

/// Implementation of the verified_search tool.
pub async fn search_impl(pipeline: &VerifiedSearch, params: VerifiedSearchParams) -> Result<CallToolResult, McpError> {
    if params.query.trim().is_empty() {
        return Err(Error::InvalidInput("query cannot be empty".into()).into());
    }

    let set = match &params.tags {
        Some(tags) => pipeline.run_for_tags(&params.query, tags).await?,
        None => pipeline.run(&params.query).await?,
    };

    let output = VerifiedSearchOutput {
        query: set.query,
        current_year: set.current_year,
        is_historical_query: set.is_historical_query,
        total_results: set.total_count,
        current_year_results: set.current_year_count,
        outdated_results: set.outdated_count,
        selected_results: set.selected_count,
        evidence: set.combined_evidence_text,
        results_by_tag: set.per_tag_results,
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rechtsbron_client::{NO_RESULTS_MESSAGE, OUTDATED_NOTICE, SearchError, SearchProvider, SearchRequest};
    use rechtsbron_core::{AppConfig, ManualClock, RawSearchItem};
    use std::sync::Arc;

    /// Answers every `site:wetten.overheid.nl` query with the same items.
    struct StatuteProvider(Vec<RawSearchItem>);

    #[async_trait::async_trait]
    impl SearchProvider for StatuteProvider {
        async fn search(&self, request: &SearchRequest) -> Result<Vec<RawSearchItem>, SearchError> {
            if request.q.starts_with("site:wetten.overheid.nl ") { Ok(self.0.clone()) } else { Ok(Vec::new()) }
        }
    }

    fn statute(path: &str, snippet: &str) -> RawSearchItem {
        RawSearchItem {
            title: format!("Regeling {path}"),
            link: format!("https://wetten.overheid.nl/{path}"),
            snippet: snippet.to_string(),
            display_link: "wetten.overheid.nl".to_string(),
        }
    }

    fn pipeline(items: Vec<RawSearchItem>) -> VerifiedSearch {
        let clock = Arc::new(ManualClock::new(chrono::Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap()));
        VerifiedSearch::with_provider(&AppConfig::default(), Arc::new(StatuteProvider(items)), clock).unwrap()
    }

    fn parse(result: &CallToolResult) -> VerifiedSearchOutput {
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_search_reports_counts_and_evidence() {
        let search = pipeline(vec![statute("oud", "Bedrag 2019"), statute("nieuw", "Bedrag 2026")]);
        let params = VerifiedSearchParams { query: "zorgtoeslag".into(), tags: None };

        let output = parse(&search_impl(&search, params).await.unwrap());

        assert_eq!(output.current_year, 2026);
        assert_eq!(output.total_results, 2);
        assert_eq!(output.current_year_results, 1);
        assert_eq!(output.outdated_results, 1);
        assert_eq!(output.selected_results, 1);
        assert!(output.evidence.contains("https://wetten.overheid.nl/nieuw"));
        assert!(!output.evidence.contains("https://wetten.overheid.nl/oud"));
        assert_eq!(output.results_by_tag[&SourceTag::Statutes].len(), 2);
        assert_eq!(output.results_by_tag.len(), SourceTag::ALL.len());
    }

    #[tokio::test]
    async fn test_search_no_results() {
        let search = pipeline(Vec::new());
        let params = VerifiedSearchParams { query: "onbekend".into(), tags: None };

        let output = parse(&search_impl(&search, params).await.unwrap());

        assert_eq!(output.total_results, 0);
        assert_eq!(output.evidence, NO_RESULTS_MESSAGE);
    }

    #[tokio::test]
    async fn test_search_only_outdated() {
        let search = pipeline(vec![statute("oud", "Tarief 2022")]);
        let params = VerifiedSearchParams { query: "tarief".into(), tags: None };

        let output = parse(&search_impl(&search, params).await.unwrap());

        assert_eq!(output.evidence, OUTDATED_NOTICE);
        assert_eq!(output.selected_results, 0);
    }

    #[tokio::test]
    async fn test_search_with_tags() {
        let search = pipeline(vec![statute("nieuw", "Bedrag 2026")]);
        let params = VerifiedSearchParams { query: "bedrag".into(), tags: Some(vec![SourceTag::CaseLaw]) };

        let output = parse(&search_impl(&search, params).await.unwrap());

        assert_eq!(output.total_results, 0);
        assert_eq!(output.results_by_tag.keys().copied().collect::<Vec<_>>(), vec![SourceTag::CaseLaw]);
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let search = pipeline(Vec::new());
        let params = VerifiedSearchParams { query: "  ".into(), tags: None };

        let err = search_impl(&search, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_search_empty_tag_list() {
        let search = pipeline(Vec::new());
        let params = VerifiedSearchParams { query: "bedrag".into(), tags: Some(Vec::new()) };

        let err = search_impl(&search, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[test]
    fn test_params_deserialize_snake_case_tags() {
        let params: VerifiedSearchParams =
            serde_json::from_str(r#"{"query": "boete", "tags": ["fines_database", "case_law"]}"#).unwrap();
        assert_eq!(params.tags, Some(vec![SourceTag::FinesDatabase, SourceTag::CaseLaw]));

        let params: VerifiedSearchParams = serde_json::from_str(r#"{"query": "boete"}"#).unwrap();
        assert!(params.tags.is_none());
    }
}
