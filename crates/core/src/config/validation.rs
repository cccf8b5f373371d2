//! Post-load checks for `AppConfig`.
//!
//! Everything here runs once at startup. A rejected value stops the server
//! before any upstream call is made.

use std::fmt::Display;
use std::ops::RangeInclusive;

use crate::config::AppConfig;
use thiserror::Error;

/// Errors raised while loading or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration value for {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("required configuration {field} is not set ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.to_string(), reason: reason.into() }
}

fn within<T: PartialOrd + Display>(field: &str, value: T, bounds: RangeInclusive<T>) -> Result<(), ConfigError> {
    if bounds.contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is outside {}..={}", bounds.start(), bounds.end())))
    }
}

impl AppConfig {
    /// Check loaded values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for the first offending field:
    /// - `timeout_ms` outside 100..=300000
    /// - `max_concurrency` outside 1..=32
    /// - `results_per_domain` outside 1..=10
    /// - blank `user_agent` or `search_base_url`
    /// - a zero cache TTL
    /// - a `site_groups` override that leaves a source tag without domains
    ///   or lists a domain twice
    pub fn validate(&self) -> Result<(), ConfigError> {
        within("timeout_ms", self.timeout_ms, 100..=300_000)?;
        within("max_concurrency", self.max_concurrency, 1..=32)?;
        within("results_per_domain", self.results_per_domain, 1..=10)?;

        for (field, value) in [("user_agent", &self.user_agent), ("search_base_url", &self.search_base_url)] {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be blank"));
            }
        }

        let ttls = [
            ("cache_ttl.statute_secs", self.cache_ttl.statute_secs),
            ("cache_ttl.case_law_secs", self.cache_ttl.case_law_secs),
            ("cache_ttl.policy_secs", self.cache_ttl.policy_secs),
            ("cache_ttl.default_secs", self.cache_ttl.default_secs),
        ];
        if let Some((field, _)) = ttls.iter().find(|(_, secs)| *secs == 0) {
            return Err(invalid(field, "must be greater than 0"));
        }

        if self.site_groups.is_some() {
            self.site_registry().map_err(|e| invalid("site_groups", e.to_string()))?;
        }

        if self.cache_ttl.statute_secs < self.cache_ttl.default_secs {
            tracing::warn!(
                statute_secs = self.cache_ttl.statute_secs,
                default_secs = self.cache_ttl.default_secs,
                "statute TTL is shorter than the default TTL; \
                 statute texts will be refetched more often than unknown domains"
            );
        }

        Ok(())
    }
}
