//! cache_purge tool implementation.
//!
//! Drops expired search results from the in-memory cache, or all of them.

use rechtsbron_core::{Error, ResultCache};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Drop every entry instead of only the expired ones.
    #[serde(default)]
    pub all: bool,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub purged: usize,
    /// Number of entries left.
    pub remaining: usize,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(cache: &ResultCache, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let purged = if params.all { cache.clear().await } else { cache.purge_expired().await };
    let remaining = cache.len().await;

    tracing::info!(purged, remaining, all = params.all, "cache purged");

    let output = CachePurgeOutput { purged, remaining };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
