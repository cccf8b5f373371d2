//! In-memory cache for per-domain search results.
//!
//! This module provides a process-local, TTL-based cache keyed by
//! `(domain, query)`. It supports:
//!
//! - Stable SHA-256 keys
//! - TTLs chosen by domain class (statute text lives longest)
//! - Lazy eviction of expired entries on read
//! - Explicit purge of expired entries and a global clear

pub mod hash;
pub mod store;
pub mod ttl;

pub use store::ResultCache;
pub use ttl::{CacheTtlPolicy, DomainClass};
