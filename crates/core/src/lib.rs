//! Core types and shared functionality for rechtsbron.
//!
//! This crate provides:
//! - Source tags, search results and freshness verdicts
//! - Freshness validation and historical query detection
//! - The site group registry
//! - In-memory result cache with per-domain-class TTLs
//! - Bounded concurrency gate for upstream calls
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod freshness;
pub mod limiter;
pub mod registry;
pub mod types;

pub use cache::{CacheTtlPolicy, DomainClass, ResultCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, CacheTtlConfig, ConfigError};
pub use error::Error;
pub use freshness::{FreshnessValidator, HistoricalQueryDetector};
pub use limiter::ConcurrencyLimiter;
pub use registry::SiteRegistry;
pub use types::{FreshnessVerdict, RawSearchItem, SearchResult, SourceTag};
