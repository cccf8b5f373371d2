//! Server configuration.
//!
//! Values are merged by figment from the environment (`RECHTSBRON_*`), an
//! optional TOML file named by `RECHTSBRON_CONFIG_FILE`, and the defaults
//! below, in that order of precedence.

use std::collections::BTreeMap;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::cache::CacheTtlPolicy;
use crate::registry::SiteRegistry;
use crate::types::SourceTag;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (RECHTSBRON_*, nested keys separated by `__`)
/// 2. TOML config file (if RECHTSBRON_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the site-restricted search provider.
    ///
    /// Set via RECHTSBRON_SEARCH_API_KEY environment variable.
    #[serde(default)]
    pub search_api_key: Option<String>,

    /// Search engine identifier (`cx`) for the search provider.
    ///
    /// Set via RECHTSBRON_SEARCH_ENGINE_ID environment variable.
    #[serde(default)]
    pub search_engine_id: Option<String>,

    /// Search endpoint URL.
    ///
    /// Set via RECHTSBRON_SEARCH_BASE_URL environment variable.
    #[serde(default = "default_search_base_url")]
    pub search_base_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via RECHTSBRON_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per upstream call timeout in milliseconds.
    ///
    /// Set via RECHTSBRON_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of simultaneous upstream calls.
    ///
    /// Set via RECHTSBRON_MAX_CONCURRENCY environment variable.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Result-count hint sent with each per-domain search.
    ///
    /// Set via RECHTSBRON_RESULTS_PER_DOMAIN environment variable.
    #[serde(default = "default_results_per_domain")]
    pub results_per_domain: u8,

    /// Country boost (`gl`), e.g. "nl".
    #[serde(default = "default_country")]
    pub country: String,

    /// Interface language (`hl`), e.g. "nl".
    #[serde(default = "default_interface_language")]
    pub interface_language: String,

    /// Document language restriction (`lr`), e.g. "lang_nl".
    #[serde(default = "default_search_language")]
    pub search_language: String,

    /// Cache lifetimes per domain class.
    ///
    /// Set via RECHTSBRON_CACHE_TTL__STATUTE_SECS etc.
    #[serde(default)]
    pub cache_ttl: CacheTtlConfig,

    /// Replacement for the built-in site registry.
    ///
    /// Must list every source tag with at least one domain.
    #[serde(default)]
    pub site_groups: Option<BTreeMap<SourceTag, Vec<String>>>,
}

/// Cache lifetimes in seconds, per domain class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheTtlConfig {
    #[serde(default = "default_statute_secs")]
    pub statute_secs: u64,
    #[serde(default = "default_case_law_secs")]
    pub case_law_secs: u64,
    #[serde(default = "default_policy_secs")]
    pub policy_secs: u64,
    #[serde(default = "default_other_secs")]
    pub default_secs: u64,
}

fn default_search_base_url() -> String {
    "https://www.googleapis.com/customsearch/v1".into()
}

fn default_user_agent() -> String {
    "rechtsbron/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_concurrency() -> usize {
    crate::limiter::DEFAULT_CAPACITY
}

fn default_results_per_domain() -> u8 {
    10
}

fn default_country() -> String {
    "nl".into()
}

fn default_interface_language() -> String {
    "nl".into()
}

fn default_search_language() -> String {
    "lang_nl".into()
}

fn default_statute_secs() -> u64 {
    4 * 3600
}

fn default_case_law_secs() -> u64 {
    2 * 3600
}

fn default_policy_secs() -> u64 {
    3600
}

fn default_other_secs() -> u64 {
    30 * 60
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            statute_secs: default_statute_secs(),
            case_law_secs: default_case_law_secs(),
            policy_secs: default_policy_secs(),
            default_secs: default_other_secs(),
        }
    }
}

impl CacheTtlConfig {
    /// Convert to the cache's TTL policy.
    pub fn to_policy(&self) -> CacheTtlPolicy {
        let secs = |s: u64| chrono::Duration::seconds(i64::try_from(s).unwrap_or(i64::MAX).min(i64::MAX / 1000));
        CacheTtlPolicy {
            statute_text: secs(self.statute_secs),
            case_law: secs(self.case_law_secs),
            policy: secs(self.policy_secs),
            other: secs(self.default_secs),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search_api_key: None,
            search_engine_id: None,
            search_base_url: default_search_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_concurrency: default_max_concurrency(),
            results_per_domain: default_results_per_domain(),
            country: default_country(),
            interface_language: default_interface_language(),
            search_language: default_search_language(),
            cache_ttl: CacheTtlConfig::default(),
            site_groups: None,
        }
    }
}

impl AppConfig {
    /// Per-call upstream timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Merge defaults, the optional TOML file and the environment, then validate.
    ///
    /// Nested keys use a double underscore, e.g. `RECHTSBRON_CACHE_TTL__POLICY_SECS`.
    ///
    /// # Errors
    ///
    /// `ConfigError::LoadFailed` when a source cannot be read or parsed, or the
    /// first `ConfigError::Invalid` reported by [`AppConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("RECHTSBRON_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("RECHTSBRON_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Search credentials as `(api_key, engine_id)`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if either value is not set.
    pub fn require_search_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let api_key = self.search_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "search_api_key".into(),
            hint: "Set RECHTSBRON_SEARCH_API_KEY environment variable".into(),
        })?;
        let engine_id = self.search_engine_id.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "search_engine_id".into(),
            hint: "Set RECHTSBRON_SEARCH_ENGINE_ID environment variable".into(),
        })?;
        Ok((api_key, engine_id))
    }

    /// Site registry from `site_groups`, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptySiteGroup` or `Error::DuplicateDomain` for an
    /// incomplete override.
    pub fn site_registry(&self) -> Result<SiteRegistry, Error> {
        match &self.site_groups {
            Some(groups) => SiteRegistry::new(groups.clone()),
            None => Ok(SiteRegistry::builtin()),
        }
    }
}
