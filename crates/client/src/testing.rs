//! Scripted search provider for pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rechtsbron_core::RawSearchItem;

use crate::search::{SearchError, SearchProvider, SearchRequest};

/// Canned behaviour for one domain.
#[derive(Clone)]
pub enum Script {
    Items(Vec<RawSearchItem>),
    Fail(SearchError),
    Delay(Duration, Vec<RawSearchItem>),
}

/// Provider answering from per-domain scripts and counting calls.
///
/// Domains without a script return no results.
#[derive(Default)]
pub struct ScriptedProvider {
    scripts: Mutex<HashMap<String, Script>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, domain: &str, script: Script) -> Self {
        self.scripts.lock().unwrap().insert(domain.to_string(), script);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn domain_of(q: &str) -> &str {
    q.strip_prefix("site:").and_then(|rest| rest.split_whitespace().next()).unwrap_or_default()
}

#[async_trait::async_trait]
impl SearchProvider for ScriptedProvider {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawSearchItem>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.q.clone());

        let script = self.scripts.lock().unwrap().get(domain_of(&request.q)).cloned();
        match script {
            None => Ok(Vec::new()),
            Some(Script::Items(items)) => Ok(items),
            Some(Script::Fail(err)) => Err(err),
            Some(Script::Delay(delay, items)) => {
                tokio::time::sleep(delay).await;
                Ok(items)
            }
        }
    }
}

pub fn item(domain: &str, path: &str, title: &str, snippet: &str) -> RawSearchItem {
    RawSearchItem {
        title: title.to_string(),
        link: format!("https://{domain}/{path}"),
        snippet: snippet.to_string(),
        display_link: domain.to_string(),
    }
}
