//! Search API response types and normalization.

use rechtsbron_core::RawSearchItem;
use serde::Deserialize;

/// Raw response from the Custom Search JSON API.
///
/// `items` is absent when the query has no hits.
#[derive(Debug, Deserialize)]
pub struct SearchApiResponse {
    #[serde(default)]
    pub items: Option<Vec<SearchApiItem>>,
}

/// Individual hit from the search API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchApiItem {
    #[serde(default)]
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub display_link: String,
}

impl From<SearchApiItem> for RawSearchItem {
    fn from(item: SearchApiItem) -> Self {
        RawSearchItem {
            title: item.title.trim().to_string(),
            link: item.link,
            snippet: item.snippet.trim().to_string(),
            display_link: item.display_link,
        }
    }
}

impl SearchApiResponse {
    /// Convert to raw records in upstream order, dropping hits without a link.
    pub fn into_items(self) -> Vec<RawSearchItem> {
        self.items
            .unwrap_or_default()
            .into_iter()
            .filter(|item| !item.link.trim().is_empty())
            .map(RawSearchItem::from)
            .collect()
    }
}
