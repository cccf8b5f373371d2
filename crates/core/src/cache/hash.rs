//! Cache key generation for per-domain search results.

use sha2::{Digest, Sha256};

/// Compute the cache key for a `(domain, query)` pair.
///
/// The domain is lowercased and both parts are trimmed, so trivially
/// different spellings of the same search share one entry.
pub fn compute_cache_key(domain: &str, query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(domain.trim().to_lowercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(query.trim().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stability() {
        let hash1 = compute_cache_key("wetten.overheid.nl", "huurtoeslag");
        let hash2 = compute_cache_key("wetten.overheid.nl", "huurtoeslag");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_normalizes_domain_case() {
        let lower = compute_cache_key("wetten.overheid.nl", "huurtoeslag");
        let upper = compute_cache_key(" Wetten.Overheid.NL", "huurtoeslag ");
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_hash_different_domain() {
        let a = compute_cache_key("wetten.overheid.nl", "huurtoeslag");
        let b = compute_cache_key("rijksoverheid.nl", "huurtoeslag");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_separator_prevents_collisions() {
        let a = compute_cache_key("ab", "c");
        let b = compute_cache_key("a", "bc");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_format() {
        let hash = compute_cache_key("wetten.overheid.nl", "huurtoeslag");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
