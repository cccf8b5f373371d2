//! Cache lifetimes by domain class.
//!
//! Statute texts change rarely and are kept longest; policy and tax pages
//! move fastest among the known classes. Unknown domains get the shortest TTL.

use chrono::Duration;

/// Domain substrings for consolidated statute texts.
const STATUTE_TEXT_PATTERNS: &[&str] =
    &["wetten.overheid.nl", "zoek.officielebekendmakingen.nl", "lokaleregelgeving.overheid.nl", "eur-lex.europa.eu"];

/// Domain substrings for court and disciplinary rulings.
const CASE_LAW_PATTERNS: &[&str] = &["rechtspraak.nl", "raadvanstate.nl", "tuchtrecht.overheid.nl"];

/// Domain substrings for policy and tax authority pages.
const POLICY_PATTERNS: &[&str] = &["belastingdienst.nl", "rijksoverheid.nl", "boetebase.om.nl"];

/// Classification of a domain for cache lifetime purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainClass {
    StatuteText,
    CaseLaw,
    Policy,
    Other,
}

impl DomainClass {
    /// Classify `domain` by substring match, longest-lived class first.
    pub fn classify(domain: &str) -> Self {
        let domain = domain.to_lowercase();
        let matches = |patterns: &[&str]| patterns.iter().any(|p| domain.contains(p));

        if matches(STATUTE_TEXT_PATTERNS) {
            DomainClass::StatuteText
        } else if matches(CASE_LAW_PATTERNS) {
            DomainClass::CaseLaw
        } else if matches(POLICY_PATTERNS) {
            DomainClass::Policy
        } else {
            DomainClass::Other
        }
    }
}

/// TTL per domain class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtlPolicy {
    pub statute_text: Duration,
    pub case_law: Duration,
    pub policy: Duration,
    pub other: Duration,
}

impl Default for CacheTtlPolicy {
    fn default() -> Self {
        Self {
            statute_text: Duration::hours(4),
            case_law: Duration::hours(2),
            policy: Duration::hours(1),
            other: Duration::minutes(30),
        }
    }
}

impl CacheTtlPolicy {
    pub fn ttl_for_class(&self, class: DomainClass) -> Duration {
        match class {
            DomainClass::StatuteText => self.statute_text,
            DomainClass::CaseLaw => self.case_law,
            DomainClass::Policy => self.policy,
            DomainClass::Other => self.other,
        }
    }

    /// TTL for entries cached under `domain`.
    pub fn ttl_for_domain(&self, domain: &str) -> Duration {
        self.ttl_for_class(DomainClass::classify(domain))
    }
}
