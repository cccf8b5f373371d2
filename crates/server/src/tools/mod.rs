//! MCP tool implementations.
//!
//! This module contains all tools exposed by the rechtsbron server.

pub mod cache_purge;
pub mod verified_search;

pub use cache_purge::{CachePurgeOutput, CachePurgeParams};
pub use verified_search::{VerifiedSearchOutput, VerifiedSearchParams};
