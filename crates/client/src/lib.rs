//! Search pipeline for rechtsbron.
//!
//! This crate provides the upstream search client, the per-domain executor,
//! the aggregating workflow and the evidence formatter used by the server.

pub mod aggregate;
pub mod executor;
pub mod format;
pub mod links;
pub mod search;

#[cfg(test)]
mod testing;

pub use aggregate::{AggregatedResultSet, QueryStats, VerifiedSearch};
pub use executor::{DomainSearch, DomainSearcher, FetchSource};
pub use format::{NO_RESULTS_MESSAGE, OUTDATED_NOTICE, format_evidence, instruction_block};
pub use search::{CustomSearchClient, CustomSearchConfig, SearchError, SearchHints, SearchProvider, SearchRequest};
